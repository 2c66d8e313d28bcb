//! Rust Cuckoo哈希集合库
//!
//! 每个键只可能位于 `k` 个候选槽位之一（每个哈希函数一个），查询在最坏情况下也是O(1)。
//! 冲突通过有界的踢出链解决，踢出链出现循环时先原地重哈希，再按素数几何扩容。
//!
//! ## 主要特性
//! - 可插拔的哈希函数族 ([`HashFamily`])，支持按需重新生成
//! - 可注入、可播种的随机源，踢出序列可复现
//! - 表容量始终为素数，负载因子始终低于上限
//! - 重哈希/扩容是事务性的：失败时表回到插入前的状态
//! - 操作统计与Prometheus格式导出
//!
//! ## 快速开始
//!
//! ```rust
//! use cuckoo_hashtable::*;
//!
//! let family = SeededHashFamily::with_seed(2, HashAlgorithm::AHash, 7).expect("哈希族创建失败");
//! let mut table = CuckooHashTable::new(family).expect("哈希表创建失败");
//!
//! assert_eq!(table.insert("key1").expect("插入失败"), true);
//! assert_eq!(table.insert("key1").expect("插入失败"), false);
//! assert!(table.contains(&"key1"));
//!
//! assert!(table.remove(&"key1"));
//! assert!(!table.contains(&"key1"));
//!
//! println!("{:?}", table.stats());
//! ```

#![warn(clippy::all)]

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}

// 核心模块导出
pub mod error;
pub mod types;
pub mod hash;
pub mod memory;
pub mod map;
pub mod stats;

// 公共接口导出
pub use crate::{
    error::CuckooError,
    hash::{HashAlgorithm, HashFamily, PolynomialHashFamily, SeededHashFamily},
    map::{CuckooHashTable, CuckooTableConfig, CuckooTableStats, DEFAULT_CONFIG},
    memory::{is_prime, next_prime, SlotStore},
    stats::{AtomicStatsRecorder, DisabledStatsRecorder, StatsRecorder},
    types::OperationType,
};

/// 使用随机种子哈希族的默认表类型
pub type DefaultTable<K> = CuckooHashTable<K, SeededHashFamily>;

/// 批量插入
///
/// 返回新插入（此前不存在）的键数量；遇到第一个错误即停止。
pub fn batch_insert<K, F, R>(
    table: &mut CuckooHashTable<K, F, R>,
    keys: impl IntoIterator<Item = K>,
) -> Result<usize, CuckooError>
where
    K: Eq,
    F: HashFamily<K>,
    R: rand::Rng,
{
    let mut count = 0;
    for key in keys {
        if table.insert(key)? {
            count += 1;
        }
    }
    Ok(count)
}

/// 批量查询
pub fn batch_contains<'a, K, F, R>(
    table: &CuckooHashTable<K, F, R>,
    keys: impl IntoIterator<Item = &'a K>,
) -> Vec<bool>
where
    K: Eq + 'a,
    F: HashFamily<K>,
{
    keys.into_iter().map(|key| table.contains(key)).collect()
}
