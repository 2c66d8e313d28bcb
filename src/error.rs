//! 统一错误处理 - 所有可能错误类型和恢复逻辑
//!
//! 成员查询（`contains` / `remove` / `position_of`）不产生错误，只用 `bool` / `Option` 表示结果。

/// Cuckoo哈希表可能发生的错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CuckooError {
    #[error("槽位数组分配失败 (槽位数: {slots})")]
    AllocationFailed {
        slots: usize,
    },

    #[error("重哈希/扩容次数耗尽，无法安置所有键 (容量: {capacity}, 升级次数: {escalations})")]
    CapacityExhausted {
        capacity: usize,
        escalations: usize,
    },

    #[error("无效配置: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

impl CuckooError {
    /// 获取错误恢复建议
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::AllocationFailed { .. } => Some("检查系统内存或减小表大小"),
            Self::CapacityExhausted { .. } => Some("使用更独立的哈希函数族，或放宽最大容量/升级次数限制"),
            Self::InvalidConfig { .. } => Some("检查配置参数"),
        }
    }

    /// 判断错误是否可恢复
    ///
    /// 容量耗尽时表已回滚到插入前的状态，调用方可以换哈希族或调整配置后重试。
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::AllocationFailed { .. })
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig { reason: reason.into() }
    }
}
