//! 哈希模块 - 哈希函数族接口及其实现

pub mod family;
pub mod polynomial;
pub mod seeded;

pub use family::HashFamily;
pub use polynomial::PolynomialHashFamily;
pub use seeded::{HashAlgorithm, SeededHashFamily};

/// 把原始哈希值映射到 `[0, capacity)` 内的槽位下标
///
/// 原始值可能为负，取非负余数。`capacity` 必须大于0。
#[inline]
pub fn slot_index(hash: i64, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    hash.rem_euclid(capacity as i64) as usize
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_index_in_range() {
        assert_eq!(slot_index(294, 5), 4);
        assert_eq!(slot_index(294, 13), 8);
        assert_eq!(slot_index(0, 7), 0);
    }

    #[test]
    fn test_slot_index_negative_hash() {
        assert_eq!(slot_index(-1, 5), 4);
        assert_eq!(slot_index(-10, 5), 0);
        assert_eq!(slot_index(i64::MIN, 101), i64::MIN.rem_euclid(101) as usize);
        assert!(slot_index(i64::MIN, 101) < 101);
    }
}
