//! 哈希表核心模块 - 实现Cuckoo哈希表及其组件

pub mod cuckoo_table;
mod displacement;

pub use cuckoo_table::{CuckooHashTable, CuckooTableConfig, CuckooTableStats, DEFAULT_TABLE_SIZE};

use once_cell::sync::Lazy;

/// 全局默认配置
pub static DEFAULT_CONFIG: Lazy<CuckooTableConfig> = Lazy::new(CuckooTableConfig::default);
