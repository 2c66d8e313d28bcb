// src/stats/recorder.rs
//! 统计记录器接口 - 定义统一统计API

use crate::types::OperationType;
use std::sync::atomic::{AtomicU64, Ordering};

/// 统计记录器特征
pub trait StatsRecorder: Send + Sync {
    /// 记录一次操作
    fn record(&self, op_type: OperationType) {
        self.record_n(op_type, 1);
    }

    /// 记录 `n` 次同类操作
    fn record_n(&self, op_type: OperationType, n: u64);

    /// 获取操作统计快照
    fn snapshot(&self) -> OperationStatsSnapshot;

    /// 重置所有统计
    fn reset(&self);

    /// 导出Prometheus格式指标
    fn export_prometheus(&self) -> String;
}

/// 操作统计快照
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationStatsSnapshot {
    pub insert_count: u64,
    pub duplicate_insert_count: u64,
    pub remove_count: u64,
    pub lookup_count: u64,
    pub displacement_count: u64,
    pub rehash_count: u64,
    pub expand_count: u64,
    pub failed_insert_count: u64,
}

/// 原子计数统计（默认实现）
#[derive(Debug, Default)]
pub struct AtomicStatsRecorder {
    insert_count: AtomicU64,
    duplicate_insert_count: AtomicU64,
    remove_count: AtomicU64,
    lookup_count: AtomicU64,
    displacement_count: AtomicU64,
    rehash_count: AtomicU64,
    expand_count: AtomicU64,
    failed_insert_count: AtomicU64,
}

impl AtomicStatsRecorder {
    /// 创建新统计
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, op_type: OperationType) -> &AtomicU64 {
        match op_type {
            OperationType::Insert => &self.insert_count,
            OperationType::DuplicateInsert => &self.duplicate_insert_count,
            OperationType::Remove => &self.remove_count,
            OperationType::Lookup => &self.lookup_count,
            OperationType::Displacement => &self.displacement_count,
            OperationType::Rehash => &self.rehash_count,
            OperationType::Expand => &self.expand_count,
            OperationType::FailedInsert => &self.failed_insert_count,
        }
    }
}

impl StatsRecorder for AtomicStatsRecorder {
    fn record_n(&self, op_type: OperationType, n: u64) {
        self.counter(op_type).fetch_add(n, Ordering::Relaxed);
    }

    fn snapshot(&self) -> OperationStatsSnapshot {
        OperationStatsSnapshot {
            insert_count: self.insert_count.load(Ordering::Relaxed),
            duplicate_insert_count: self.duplicate_insert_count.load(Ordering::Relaxed),
            remove_count: self.remove_count.load(Ordering::Relaxed),
            lookup_count: self.lookup_count.load(Ordering::Relaxed),
            displacement_count: self.displacement_count.load(Ordering::Relaxed),
            rehash_count: self.rehash_count.load(Ordering::Relaxed),
            expand_count: self.expand_count.load(Ordering::Relaxed),
            failed_insert_count: self.failed_insert_count.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        for op in OperationType::ALL {
            self.counter(op).store(0, Ordering::Relaxed);
        }
    }

    fn export_prometheus(&self) -> String {
        let mut output = String::new();

        for op in OperationType::ALL {
            output.push_str(&format!(
                "# HELP cuckoo_operation_{}_count Total {} operations\n",
                op.as_str(),
                op.as_str()
            ));
            output.push_str(&format!("# TYPE cuckoo_operation_{}_count counter\n", op.as_str()));
            output.push_str(&format!(
                "cuckoo_operation_{}_count {}\n",
                op.as_str(),
                self.counter(op).load(Ordering::Relaxed)
            ));
        }

        output
    }
}

/// 禁用统计实现
#[derive(Debug, Default)]
pub struct DisabledStatsRecorder;

impl StatsRecorder for DisabledStatsRecorder {
    fn record_n(&self, _op_type: OperationType, _n: u64) {}
    fn snapshot(&self) -> OperationStatsSnapshot {
        OperationStatsSnapshot::default()
    }
    fn reset(&self) {}
    fn export_prometheus(&self) -> String {
        String::new()
    }
}
