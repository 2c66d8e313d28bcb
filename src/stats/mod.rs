//! 统计模块 - 统一管理哈希表操作指标

pub mod recorder;

pub use recorder::{AtomicStatsRecorder, DisabledStatsRecorder, OperationStatsSnapshot, StatsRecorder};
