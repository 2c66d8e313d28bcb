//! Cuckoo哈希表核心实现
//!
//! 每个键只可能位于 `k` 个候选槽位之一，查询最多探测 `k` 次。
//! 插入冲突时随机踢出占用者；踢出链超过上限视为循环，
//! 先原地重哈希（换一组哈希函数），重哈希次数用尽后按素数扩容。
//! 重哈希/扩容在旁路规划新布局，全部键都有位置后才整体替换槽位数组，
//! 失败时表回到插入前的状态。

use crate::{
    error::CuckooError,
    hash::{slot_index, HashFamily},
    map::{
        displacement::{displace, undo, Displacement, DisplacementLimits},
        DEFAULT_CONFIG,
    },
    memory::{next_prime, SlotStore},
    stats::{AtomicStatsRecorder, StatsRecorder},
    types::{Escalation, OperationType},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{fmt, iter, sync::Arc};

/// 默认表大小（素数）
pub const DEFAULT_TABLE_SIZE: usize = 101;

/// 哈希表配置
#[derive(Clone, Debug, PartialEq)]
pub struct CuckooTableConfig {
    /// 初始槽位数，实际容量为不小于它的最小素数
    pub initial_size: usize,
    /// 负载因子上限，插入后 `len < capacity * max_load_factor`
    pub max_load_factor: f64,
    /// 两次扩容之间允许的连续重哈希次数
    pub allowed_rehashes: usize,
    /// 一轮踢出的最大次数
    pub max_displacements: usize,
    /// 随机选中刚踢出的槽位时的重选次数
    pub eviction_retries: usize,
    /// 单次插入最多的重哈希/扩容次数
    pub max_escalations: usize,
    /// 容量上限，`None` 表示只受内存限制
    pub max_capacity: Option<usize>,
}

impl Default for CuckooTableConfig {
    fn default() -> Self {
        Self {
            initial_size: DEFAULT_TABLE_SIZE,
            max_load_factor: 0.4,
            allowed_rehashes: 1,
            max_displacements: 100,
            eviction_retries: 5,
            max_escalations: 16,
            max_capacity: None,
        }
    }
}

impl CuckooTableConfig {
    /// 校验配置
    pub fn validate(&self) -> Result<(), CuckooError> {
        if !(self.max_load_factor > 0.0 && self.max_load_factor < 1.0) {
            return Err(CuckooError::invalid_config(format!(
                "max_load_factor 必须在 (0, 1) 之间，实际 {}",
                self.max_load_factor
            )));
        }
        if self.max_displacements == 0 {
            return Err(CuckooError::invalid_config("max_displacements 必须大于0"));
        }
        if self.max_escalations == 0 {
            return Err(CuckooError::invalid_config("max_escalations 必须大于0"));
        }
        let initial_capacity = next_prime(self.initial_size)
            .ok_or_else(|| CuckooError::invalid_config("initial_size 过大"))?;
        if let Some(max_capacity) = self.max_capacity {
            if max_capacity < initial_capacity {
                return Err(CuckooError::invalid_config(format!(
                    "max_capacity {} 小于初始容量 {}",
                    max_capacity, initial_capacity
                )));
            }
        }
        Ok(())
    }

    fn limits(&self) -> DisplacementLimits {
        DisplacementLimits {
            max_displacements: self.max_displacements,
            eviction_retries: self.eviction_retries,
        }
    }
}

/// 哈希表统计信息
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CuckooTableStats {
    pub size: usize,
    pub capacity: usize,
    pub load_factor: f64,
    pub consecutive_rehashes: usize,
    pub insert_count: u64,
    pub duplicate_insert_count: u64,
    pub remove_count: u64,
    pub lookup_count: u64,
    pub displacement_count: u64,
    pub rehash_count: u64,
    pub expand_count: u64,
    pub failed_insert_count: u64,
}

/// Cuckoo哈希表（集合语义）
///
/// - `K`: 键类型，只需要相等比较
/// - `F`: 哈希函数族
/// - `R`: 踢出时使用的随机源，可注入固定种子以复现踢出序列
///
/// 表不做内部同步；多线程访问需要调用方整体加锁。
pub struct CuckooHashTable<K, F, R = StdRng> {
    // 槽位数组，重哈希/扩容时整体替换
    store: SlotStore<K>,

    // 哈希函数族
    family: F,

    // 踢出随机源
    rng: R,

    // 配置
    config: CuckooTableConfig,

    // 上次扩容以来的连续重哈希次数
    rehashes: usize,

    // 统计记录器
    stats_recorder: Arc<dyn StatsRecorder>,
}

impl<K, F: HashFamily<K>> CuckooHashTable<K, F, StdRng> {
    /// 使用默认配置创建（容量101），随机源取自系统熵
    ///
    /// 函数族少于2个函数时返回 `InvalidConfig`。
    pub fn new(family: F) -> Result<Self, CuckooError> {
        Self::with_config(family, DEFAULT_CONFIG.clone())
    }

    /// 指定初始大小创建，实际容量为不小于它的最小素数
    pub fn with_capacity(family: F, initial_size: usize) -> Result<Self, CuckooError> {
        Self::with_config(
            family,
            CuckooTableConfig {
                initial_size,
                ..DEFAULT_CONFIG.clone()
            },
        )
    }

    /// 指定配置创建
    pub fn with_config(family: F, config: CuckooTableConfig) -> Result<Self, CuckooError> {
        Self::with_rng(family, config, StdRng::from_entropy())
    }
}

impl<K, F: HashFamily<K>, R: Rng> CuckooHashTable<K, F, R> {
    /// 指定配置和随机源创建
    pub fn with_rng(family: F, config: CuckooTableConfig, rng: R) -> Result<Self, CuckooError> {
        config.validate()?;
        if family.count() < 2 {
            return Err(CuckooError::invalid_config(format!(
                "哈希函数族至少需要2个函数，实际 {}",
                family.count()
            )));
        }
        let store = SlotStore::with_prime_capacity(config.initial_size)?;
        log_debug!("cuckoo table created with capacity {}", store.capacity());
        Ok(Self {
            store,
            family,
            rng,
            config,
            rehashes: 0,
            stats_recorder: Arc::new(AtomicStatsRecorder::new()),
        })
    }
}

impl<K, F, R> CuckooHashTable<K, F, R> {
    /// 替换统计记录器
    pub fn with_stats_recorder(mut self, stats_recorder: Arc<dyn StatsRecorder>) -> Self {
        self.stats_recorder = stats_recorder;
        self
    }

    /// 元素个数
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// 槽位总数（始终为素数）
    #[inline]
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// 按槽位顺序遍历所有键
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        self.store.iter().map(|(_, key)| key)
    }

    pub fn family(&self) -> &F {
        &self.family
    }

    pub fn config(&self) -> &CuckooTableConfig {
        &self.config
    }

    /// 上次扩容以来的连续重哈希次数
    pub fn consecutive_rehashes(&self) -> usize {
        self.rehashes
    }

    /// 清空所有槽位，不重新分配
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// 导出Prometheus格式指标
    pub fn export_prometheus(&self) -> String {
        self.stats_recorder.export_prometheus()
    }

    /// 获取统计信息
    pub fn stats(&self) -> CuckooTableStats {
        let op_stats = self.stats_recorder.snapshot();
        CuckooTableStats {
            size: self.len(),
            capacity: self.capacity(),
            load_factor: self.load_factor(),
            consecutive_rehashes: self.rehashes,
            insert_count: op_stats.insert_count,
            duplicate_insert_count: op_stats.duplicate_insert_count,
            remove_count: op_stats.remove_count,
            lookup_count: op_stats.lookup_count,
            displacement_count: op_stats.displacement_count,
            rehash_count: op_stats.rehash_count,
            expand_count: op_stats.expand_count,
            failed_insert_count: op_stats.failed_insert_count,
        }
    }
}

impl<K: Eq, F: HashFamily<K>, R> CuckooHashTable<K, F, R> {
    /// 键所在的槽位下标
    ///
    /// 依次探测 `k` 个候选槽位，返回第一个存放该键的位置。
    pub fn position_of(&self, key: &K) -> Option<usize> {
        let capacity = self.capacity();
        (0..self.family.count())
            .map(|which| slot_index(self.family.hash(key, which), capacity))
            .find(|&index| self.store.get(index) == Some(key))
    }

    /// 是否包含键
    pub fn contains(&self, key: &K) -> bool {
        self.stats_recorder.record(OperationType::Lookup);
        self.position_of(key).is_some()
    }

    /// 删除键，不存在时返回 `false`
    ///
    /// 不需要墓碑：空出的槽位可以直接被任何以它为候选的键使用。
    pub fn remove(&mut self, key: &K) -> bool {
        match self.position_of(key) {
            Some(index) => {
                self.store.take(index);
                self.stats_recorder.record(OperationType::Remove);
                true
            }
            None => false,
        }
    }
}

impl<K: Eq, F: HashFamily<K>, R: Rng> CuckooHashTable<K, F, R> {
    /// 插入键
    ///
    /// 返回 `Ok(false)` 表示键已存在（无操作）。
    /// 只有分配失败或重哈希/扩容次数耗尽时返回错误，此时表保持插入前的状态。
    pub fn insert(&mut self, key: K) -> Result<bool, CuckooError> {
        if self.position_of(&key).is_some() {
            self.stats_recorder.record(OperationType::DuplicateInsert);
            return Ok(false);
        }

        let result = if self.exceeds_load(self.len() + 1, self.capacity()) {
            match self.grown_capacity(self.capacity(), self.len() + 1) {
                Some(capacity) => {
                    log_info!(
                        "load factor limit reached at size {}, growing {} -> {}",
                        self.len(),
                        self.capacity(),
                        capacity
                    );
                    self.relocate(key, Escalation::Expand(capacity))
                }
                None => Err(self.exhausted(0)),
            }
        } else {
            self.seat(key)
        };

        match result {
            Ok(()) => {
                self.stats_recorder.record(OperationType::Insert);
                Ok(true)
            }
            Err(e) => {
                self.stats_recorder.record(OperationType::FailedInsert);
                log_warn!(
                    "insert failed: {} ({})",
                    e,
                    e.recovery_suggestion().unwrap_or("no recovery suggestion")
                );
                Err(e)
            }
        }
    }

    /// 在当前槽位数组中安置键，出现循环时升级为重哈希/扩容
    fn seat(&mut self, key: K) -> Result<(), CuckooError> {
        let capacity = self.capacity();
        let limits = self.config.limits();
        let Self {
            store,
            family,
            rng,
            stats_recorder,
            ..
        } = self;

        let outcome = displace(
            store,
            key,
            family.count(),
            |key: &K, which| slot_index(family.hash(key, which), capacity),
            limits,
            rng,
        );

        match outcome {
            Displacement::Placed { evictions } => {
                stats_recorder.record_n(OperationType::Displacement, evictions as u64);
                Ok(())
            }
            Displacement::Cycle { homeless, path } => {
                stats_recorder.record_n(OperationType::Displacement, path.len() as u64);
                // 撤销踢出链，槽位数组回到插入前的状态
                let key = undo(store, homeless, &path);
                log_debug!(
                    "displacement cycle after {} evictions at capacity {}",
                    path.len(),
                    capacity
                );
                match self.next_escalation(capacity) {
                    Some(escalation) => self.relocate(key, escalation),
                    None => Err(self.exhausted(0)),
                }
            }
        }
    }

    /// 重哈希/扩容并安置 `pending`
    ///
    /// 每次尝试都在新数组上规划全部键（旧键按槽位顺序，`pending` 最后）；
    /// 规划失败则按策略继续升级。成功前旧数组不变，失败时恢复哈希族和重哈希计数。
    /// 重哈希/扩容次数只在提交后计入统计。
    fn relocate(&mut self, pending: K, first: Escalation) -> Result<(), CuckooError> {
        let family_checkpoint = self.family.snapshot();
        let rehashes_checkpoint = self.rehashes;
        let origins: Vec<usize> = self.store.iter().map(|(index, _)| index).collect();

        let mut capacity = self.capacity();
        let mut next = Some(first);
        let mut escalations = 0;
        let (mut rehashed, mut expanded) = (0u64, 0u64);

        let failure = loop {
            let step = match next {
                Some(step) if escalations < self.config.max_escalations => step,
                _ => break self.exhausted(escalations),
            };
            escalations += 1;

            match step {
                Escalation::Rehash => {
                    self.family.regenerate();
                    self.rehashes += 1;
                    rehashed += 1;
                    log_info!(
                        "rehash #{} at capacity {} ({} keys)",
                        self.rehashes,
                        capacity,
                        origins.len() + 1
                    );
                }
                Escalation::Expand(target) => {
                    if self.config.max_capacity.map_or(false, |max| target > max) {
                        log_warn!("expansion to {} exceeds max capacity", target);
                        break self.exhausted(escalations);
                    }
                    capacity = target;
                    self.rehashes = 0;
                    expanded += 1;
                    log_info!("expanding to capacity {} ({} keys)", capacity, origins.len() + 1);
                }
            }

            let target = match SlotStore::allocate(capacity) {
                Ok(target) => target,
                Err(e) => {
                    log_error!("failed to allocate {} slots", capacity);
                    break e;
                }
            };
            match self.plan_relocation(&origins, &pending, capacity) {
                Ok(Some(plan)) => {
                    self.commit_relocation(plan, target, &origins, pending);
                    self.stats_recorder.record_n(OperationType::Rehash, rehashed);
                    self.stats_recorder.record_n(OperationType::Expand, expanded);
                    return Ok(());
                }
                Ok(None) => next = self.next_escalation(capacity),
                Err(e) => {
                    log_error!("failed to allocate relocation plan of {} slots", capacity);
                    break e;
                }
            }
        };

        self.family.restore(family_checkpoint);
        self.rehashes = rehashes_checkpoint;
        log_warn!("relocation abandoned after {} escalations: {}", escalations, failure);
        Err(failure)
    }

    /// 在容量为 `capacity` 的数组上规划所有键的位置
    ///
    /// 规划数组存放键编号：`0..origins.len()` 对应旧数组中的键，最后一个编号为 `pending`。
    /// 任一键出现踢出循环时返回 `Ok(None)`。
    fn plan_relocation(
        &mut self,
        origins: &[usize],
        pending: &K,
        capacity: usize,
    ) -> Result<Option<SlotStore<usize>>, CuckooError> {
        let limits = self.config.limits();
        let Self {
            store,
            family,
            rng,
            stats_recorder,
            ..
        } = self;

        let mut plan = SlotStore::allocate(capacity)?;
        let keys: Vec<&K> = origins
            .iter()
            .filter_map(|&origin| store.get(origin))
            .chain(iter::once(pending))
            .collect();
        let locate = |id: &usize, which: usize| slot_index(family.hash(keys[*id], which), capacity);

        for id in 0..keys.len() {
            match displace(&mut plan, id, family.count(), &locate, limits, rng) {
                Displacement::Placed { evictions } => {
                    stats_recorder.record_n(OperationType::Displacement, evictions as u64);
                }
                Displacement::Cycle { path, .. } => {
                    stats_recorder.record_n(OperationType::Displacement, path.len() as u64);
                    log_debug!(
                        "relocation plan failed at key {} of {} (capacity {})",
                        id + 1,
                        keys.len(),
                        capacity
                    );
                    return Ok(None);
                }
            }
        }
        Ok(Some(plan))
    }

    /// 按规划把键移入新数组并替换旧数组
    fn commit_relocation(
        &mut self,
        plan: SlotStore<usize>,
        mut target: SlotStore<K>,
        origins: &[usize],
        pending: K,
    ) {
        let mut pending = Some(pending);
        for (index, &id) in plan.iter() {
            let key = match origins.get(id) {
                Some(&origin) => self.store.take(origin),
                None => pending.take(),
            };
            if let Some(key) = key {
                let placed = target.place(index, key);
                debug_assert!(placed.is_ok(), "planned slot {} must be vacant", index);
            }
        }
        debug_assert!(self.store.is_empty());
        self.store = target;
    }

    /// 出现循环后的下一步：重哈希次数未用尽则重哈希，否则扩容
    fn next_escalation(&self, capacity: usize) -> Option<Escalation> {
        if self.rehashes < self.config.allowed_rehashes {
            Some(Escalation::Rehash)
        } else {
            self.grown_capacity(capacity, self.len() + 1)
                .map(Escalation::Expand)
        }
    }

    fn exceeds_load(&self, size: usize, capacity: usize) -> bool {
        size as f64 >= capacity as f64 * self.config.max_load_factor
    }

    /// 扩容后的容量：不小于 `capacity / max_load_factor` 的最小素数，
    /// 重复直到 `size` 个键不超过负载上限
    fn grown_capacity(&self, capacity: usize, size: usize) -> Option<usize> {
        let mut capacity = capacity;
        loop {
            let scaled = capacity as f64 / self.config.max_load_factor;
            if !scaled.is_finite() || scaled >= usize::MAX as f64 {
                return None;
            }
            capacity = next_prime((scaled as usize).max(capacity.checked_add(1)?))?;
            if !self.exceeds_load(size, capacity) {
                return Some(capacity);
            }
        }
    }

    fn exhausted(&self, escalations: usize) -> CuckooError {
        CuckooError::CapacityExhausted {
            capacity: self.capacity(),
            escalations,
        }
    }
}

impl<K, F, R> fmt::Debug for CuckooHashTable<K, F, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CuckooHashTable")
            .field("size", &self.len())
            .field("capacity", &self.capacity())
            .field("load_factor", &self.load_factor())
            .finish()
    }
}
