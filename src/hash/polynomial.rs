//! 多项式字符串哈希族 - 确定性实现，主要用于测试和复现踢出序列

use crate::{error::CuckooError, hash::family::HashFamily};

/// 多项式滚动哈希族
///
/// 第 `i` 个函数为 `h = h * bases[i] + c`（逐字符，溢出回绕）。
/// 默认两个函数：底数1（字符和）与底数37。
/// `regenerate` 把每个底数加2，结果完全可复现。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolynomialHashFamily {
    bases: Vec<i64>,
    generation: u64,
}

impl PolynomialHashFamily {
    /// 默认底数：字符和、底数37
    pub const DEFAULT_BASES: [i64; 2] = [1, 37];

    /// 每次重新生成时底数的增量
    const BASE_STEP: i64 = 2;

    /// 创建默认函数族
    pub fn new() -> Self {
        Self {
            bases: Self::DEFAULT_BASES.to_vec(),
            generation: 0,
        }
    }

    /// 使用指定底数创建，至少两个
    pub fn with_bases(bases: impl Into<Vec<i64>>) -> Result<Self, CuckooError> {
        let bases = bases.into();
        if bases.len() < 2 {
            return Err(CuckooError::invalid_config(format!(
                "哈希函数族至少需要2个函数，实际 {}",
                bases.len()
            )));
        }
        Ok(Self { bases, generation: 0 })
    }

    /// 当前底数
    pub fn bases(&self) -> &[i64] {
        &self.bases
    }

    /// 已重新生成的次数
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for PolynomialHashFamily {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: AsRef<str> + ?Sized> HashFamily<K> for PolynomialHashFamily {
    type Snapshot = (Vec<i64>, u64);

    fn hash(&self, key: &K, which: usize) -> i64 {
        let base = self.bases[which];
        key.as_ref()
            .chars()
            .fold(0i64, |acc, c| acc.wrapping_mul(base).wrapping_add(c as i64))
    }

    fn count(&self) -> usize {
        self.bases.len()
    }

    fn regenerate(&mut self) {
        for base in &mut self.bases {
            *base = base.wrapping_add(Self::BASE_STEP);
        }
        self.generation += 1;
    }

    fn snapshot(&self) -> Self::Snapshot {
        (self.bases.clone(), self.generation)
    }

    fn restore(&mut self, (bases, generation): (Vec<i64>, u64)) {
        self.bases = bases;
        self.generation = generation;
    }
}
