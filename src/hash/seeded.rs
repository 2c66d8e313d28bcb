//! 随机种子哈希族 - 生产环境使用的实现

use crate::{error::CuckooError, hash::family::HashFamily};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hash::{BuildHasher, Hash, Hasher};

/// 哈希算法选择
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    AHash,
    XxHash,
    Default,
}

/// 每个函数一个64位种子的哈希族
///
/// `regenerate` 从内部随机源抽取一组新种子。
#[derive(Debug, Clone)]
pub struct SeededHashFamily<R = StdRng> {
    seeds: Vec<u64>,
    algorithm: HashAlgorithm,
    rng: R,
    generation: u64,
}

impl SeededHashFamily<StdRng> {
    /// 从系统熵创建
    pub fn new(count: usize, algorithm: HashAlgorithm) -> Result<Self, CuckooError> {
        Self::with_rng(count, algorithm, StdRng::from_entropy())
    }

    /// 使用固定种子创建，重新生成的序列也可复现
    pub fn with_seed(count: usize, algorithm: HashAlgorithm, seed: u64) -> Result<Self, CuckooError> {
        Self::with_rng(count, algorithm, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SeededHashFamily<R> {
    /// 使用指定随机源创建
    pub fn with_rng(count: usize, algorithm: HashAlgorithm, mut rng: R) -> Result<Self, CuckooError> {
        if count < 2 {
            return Err(CuckooError::invalid_config(format!(
                "哈希函数族至少需要2个函数，实际 {}",
                count
            )));
        }
        let seeds = (0..count).map(|_| rng.gen()).collect();
        Ok(Self {
            seeds,
            algorithm,
            rng,
            generation: 0,
        })
    }

    pub fn seeds(&self) -> &[u64] {
        &self.seeds
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// 已重新生成的次数
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn hash_with_seed<K: Hash + ?Sized>(&self, key: &K, seed: u64) -> u64 {
        match self.algorithm {
            HashAlgorithm::AHash => {
                let state = ahash::RandomState::with_seeds(
                    seed,
                    seed.rotate_left(21) ^ 0x9E37_79B9_7F4A_7C15,
                    seed.rotate_left(42) ^ 0xC2B2_AE3D_27D4_EB4F,
                    !seed,
                );
                let mut hasher = state.build_hasher();
                key.hash(&mut hasher);
                hasher.finish()
            }
            HashAlgorithm::XxHash => {
                let mut hasher = twox_hash::XxHash64::with_seed(seed);
                key.hash(&mut hasher);
                hasher.finish()
            }
            HashAlgorithm::Default => {
                let mut hasher = std::collections::hash_map::DefaultHasher::new();
                seed.hash(&mut hasher);
                key.hash(&mut hasher);
                hasher.finish()
            }
        }
    }
}

impl<K: Hash + ?Sized, R: Rng> HashFamily<K> for SeededHashFamily<R> {
    // 随机源不回滚，恢复后再次重新生成会得到新的种子
    type Snapshot = (Vec<u64>, u64);

    fn hash(&self, key: &K, which: usize) -> i64 {
        self.hash_with_seed(key, self.seeds[which]) as i64
    }

    fn count(&self) -> usize {
        self.seeds.len()
    }

    fn regenerate(&mut self) {
        for seed in &mut self.seeds {
            *seed = self.rng.gen();
        }
        self.generation += 1;
    }

    fn snapshot(&self) -> Self::Snapshot {
        (self.seeds.clone(), self.generation)
    }

    fn restore(&mut self, (seeds, generation): (Vec<u64>, u64)) {
        self.seeds = seeds;
        self.generation = generation;
    }
}
