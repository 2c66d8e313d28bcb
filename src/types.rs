//! 核心类型定义 - 共享类型

use std::fmt;

/// 操作类型 (用于统计)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    /// 插入新键
    Insert,
    /// 插入已存在的键（无操作）
    DuplicateInsert,
    /// 删除操作
    Remove,
    /// 查询操作
    Lookup,
    /// 踢出操作
    Displacement,
    /// 原地重哈希
    Rehash,
    /// 扩容
    Expand,
    /// 插入失败（容量耗尽或分配失败）
    FailedInsert,
}

impl OperationType {
    /// 全部操作类型
    pub const ALL: [OperationType; 8] = [
        OperationType::Insert,
        OperationType::DuplicateInsert,
        OperationType::Remove,
        OperationType::Lookup,
        OperationType::Displacement,
        OperationType::Rehash,
        OperationType::Expand,
        OperationType::FailedInsert,
    ];

    /// 指标名使用的字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Insert => "insert",
            OperationType::DuplicateInsert => "duplicate_insert",
            OperationType::Remove => "remove",
            OperationType::Lookup => "lookup",
            OperationType::Displacement => "displacement",
            OperationType::Rehash => "rehash",
            OperationType::Expand => "expand",
            OperationType::FailedInsert => "failed_insert",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 升级策略：出现踢出循环后的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// 重新生成哈希函数，容量不变
    Rehash,
    /// 扩容到给定的素数容量
    Expand(usize),
}
