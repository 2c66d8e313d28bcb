//! 踢出引擎 - 有界踢出链
//!
//! 同一套例程既用于在线插入（元素为键本身），也用于重哈希/扩容时的规划（元素为键编号）。

use crate::memory::SlotStore;
use rand::Rng;

/// 踢出链的上限
#[derive(Debug, Clone, Copy)]
pub(crate) struct DisplacementLimits {
    /// 一轮最多踢出次数
    pub max_displacements: usize,
    /// 随机选中上一次踢出的位置时的重选次数
    pub eviction_retries: usize,
}

/// 一轮踢出的结果
#[derive(Debug)]
pub(crate) enum Displacement<T> {
    /// 已安置，附带踢出次数
    Placed { evictions: usize },
    /// 踢出次数耗尽：仍未安置的元素，以及按顺序记录的踢出下标
    Cycle { homeless: T, path: Vec<usize> },
}

/// 把 `item` 安置到 `store` 中
///
/// `locate(item, which)` 返回第 `which` 个候选槽位。
/// 先依次尝试全部候选槽位；都被占用时随机踢出一个，被踢出者继续寻找位置。
pub(crate) fn displace<T, R, L>(
    store: &mut SlotStore<T>,
    mut item: T,
    hash_count: usize,
    locate: L,
    limits: DisplacementLimits,
    rng: &mut R,
) -> Displacement<T>
where
    R: Rng,
    L: Fn(&T, usize) -> usize,
{
    let mut path = Vec::new();
    if hash_count == 0 {
        return Displacement::Cycle { homeless: item, path };
    }

    let mut last_displaced = None;
    for _ in 0..limits.max_displacements {
        for which in 0..hash_count {
            let index = locate(&item, which);
            match store.place(index, item) {
                Ok(()) => return Displacement::Placed { evictions: path.len() },
                Err(returned) => item = returned,
            }
        }

        // 所有候选槽位都被占用，随机挑一个踢出，尽量避开刚踢出的位置
        let mut index = locate(&item, rng.gen_range(0..hash_count));
        let mut retries = 0;
        while Some(index) == last_displaced && retries < limits.eviction_retries {
            index = locate(&item, rng.gen_range(0..hash_count));
            retries += 1;
        }

        let swapped = store.swap(index, &mut item);
        debug_assert!(swapped, "eviction target {} must be occupied", index);
        last_displaced = Some(index);
        path.push(index);

        log_debug!("evicted slot {}, chain length {}", index, path.len());
    }

    Displacement::Cycle { homeless: item, path }
}

/// 按相反顺序撤销踢出链，返回最初要安置的元素
///
/// 交换自身可逆，撤销后 `store` 与踢出前完全一致。
pub(crate) fn undo<T>(store: &mut SlotStore<T>, mut homeless: T, path: &[usize]) -> T {
    for &index in path.iter().rev() {
        store.swap(index, &mut homeless);
    }
    homeless
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const LIMITS: DisplacementLimits = DisplacementLimits {
        max_displacements: 100,
        eviction_retries: 5,
    };

    /// 元素本身即候选位置：(第一候选, 第二候选)
    fn locate(item: &(usize, usize, char), which: usize) -> usize {
        if which == 0 {
            item.0
        } else {
            item.1
        }
    }

    #[test]
    fn test_place_in_first_free_candidate() {
        let mut store = SlotStore::allocate(5).expect("分配失败");
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = displace(&mut store, (2, 3, 'a'), 2, locate, LIMITS, &mut rng);
        assert!(matches!(outcome, Displacement::Placed { evictions: 0 }));
        assert_eq!(store.get(2).map(|item| item.2), Some('a'));

        // 第一候选被占用，落到第二候选
        let outcome = displace(&mut store, (2, 3, 'b'), 2, locate, LIMITS, &mut rng);
        assert!(matches!(outcome, Displacement::Placed { evictions: 0 }));
        assert_eq!(store.get(3).map(|item| item.2), Some('b'));
    }

    #[test]
    fn test_eviction_moves_occupant() {
        let mut store = SlotStore::allocate(5).expect("分配失败");
        let mut rng = StdRng::seed_from_u64(7);
        store.place(0, (0, 4, 'x')).expect("槽位应为空");
        store.place(1, (1, 4, 'y')).expect("槽位应为空");

        // 新元素只能放在0或1，被踢出者可以去4
        let outcome = displace(&mut store, (0, 1, 'n'), 2, locate, LIMITS, &mut rng);
        match outcome {
            Displacement::Placed { evictions } => assert_eq!(evictions, 1),
            Displacement::Cycle { .. } => panic!("应能安置"),
        }
        assert_eq!(store.len(), 3);
        assert!(store.get(4).is_some());
        let chars: Vec<char> = store.iter().map(|(_, item)| item.2).collect();
        assert!(chars.contains(&'n'));
    }

    #[test]
    fn test_cycle_and_undo_restore_store() {
        let mut store = SlotStore::allocate(3).expect("分配失败");
        let mut rng = StdRng::seed_from_u64(3);
        store.place(0, (0, 1, 'a')).expect("槽位应为空");
        store.place(1, (0, 1, 'b')).expect("槽位应为空");
        let before: Vec<_> = store.iter().map(|(i, item)| (i, *item)).collect();

        // 三个元素争两个槽位，必然循环
        let outcome = displace(&mut store, (0, 1, 'c'), 2, locate, LIMITS, &mut rng);
        let (homeless, path) = match outcome {
            Displacement::Cycle { homeless, path } => (homeless, path),
            Displacement::Placed { .. } => panic!("不应安置成功"),
        };
        assert_eq!(path.len(), LIMITS.max_displacements);

        let original = undo(&mut store, homeless, &path);
        assert_eq!(original.2, 'c');
        let after: Vec<_> = store.iter().map(|(i, item)| (i, *item)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_no_hash_functions_is_cycle() {
        let mut store: SlotStore<(usize, usize, char)> = SlotStore::allocate(3).expect("分配失败");
        let mut rng = StdRng::seed_from_u64(0);
        let outcome = displace(&mut store, (0, 1, 'a'), 0, locate, LIMITS, &mut rng);
        assert!(matches!(outcome, Displacement::Cycle { ref path, .. } if path.is_empty()));
        assert!(store.is_empty());
    }
}
