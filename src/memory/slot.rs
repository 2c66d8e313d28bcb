//! 槽位数组 - 表中唯一的可变状态
//!
//! 数组长度在分配后固定；重哈希/扩容时整体替换而不是原地调整。

use crate::{error::CuckooError, memory::prime::next_prime};
use std::fmt;

/// 定长可选槽位数组，记录已占用槽位数
pub struct SlotStore<T> {
    slots: Vec<Option<T>>,
    occupied: usize,
}

impl<T> SlotStore<T> {
    /// 分配 `capacity` 个空槽位
    ///
    /// 分配失败以 [`CuckooError::AllocationFailed`] 返回，不会中止进程。
    pub fn allocate(capacity: usize) -> Result<Self, CuckooError> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| CuckooError::AllocationFailed { slots: capacity })?;
        slots.resize_with(capacity, || None);
        Ok(Self { slots, occupied: 0 })
    }

    /// 分配不小于 `requested` 的最小素数个槽位
    pub fn with_prime_capacity(requested: usize) -> Result<Self, CuckooError> {
        let capacity = next_prime(requested).ok_or(CuckooError::AllocationFailed { slots: requested })?;
        Self::allocate(capacity)
    }

    /// 槽位总数
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// 已占用槽位数
    #[inline]
    pub fn len(&self) -> usize {
        self.occupied
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// 把元素放入空槽位
    ///
    /// 槽位已占用时原样交还元素。
    pub fn place(&mut self, index: usize, item: T) -> Result<(), T> {
        match self.slots.get_mut(index) {
            Some(slot) if slot.is_none() => {
                *slot = Some(item);
                self.occupied += 1;
                Ok(())
            }
            _ => Err(item),
        }
    }

    /// 取出槽位中的元素，槽位变为空
    pub fn take(&mut self, index: usize) -> Option<T> {
        let item = self.slots.get_mut(index)?.take();
        if item.is_some() {
            self.occupied -= 1;
        }
        item
    }

    /// 与已占用槽位中的元素交换
    ///
    /// 槽位为空或越界时返回 `false`，`item` 不变。
    pub fn swap(&mut self, index: usize, item: &mut T) -> bool {
        match self.slots.get_mut(index) {
            Some(Some(occupant)) => {
                std::mem::swap(occupant, item);
                true
            }
            _ => false,
        }
    }

    /// 清空所有槽位，不重新分配
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.occupied = 0;
    }

    /// 按槽位顺序遍历 (下标, 元素)
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|item| (index, item)))
    }
}

impl<T> fmt::Debug for SlotStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotStore")
            .field("capacity", &self.capacity())
            .field("occupied", &self.occupied)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_empty() {
        let store: SlotStore<u32> = SlotStore::allocate(7).expect("分配失败");
        assert_eq!(store.capacity(), 7);
        assert!(store.is_empty());
        assert!((0..7).all(|i| store.get(i).is_none()));
        assert_eq!(store.iter().count(), 0);
    }

    #[test]
    fn test_prime_capacity() {
        let store: SlotStore<u32> = SlotStore::with_prime_capacity(100).expect("分配失败");
        assert_eq!(store.capacity(), 101);
        let store: SlotStore<u32> = SlotStore::with_prime_capacity(0).expect("分配失败");
        assert_eq!(store.capacity(), 2);
    }

    #[test]
    fn test_place_take() {
        let mut store = SlotStore::allocate(5).expect("分配失败");
        assert_eq!(store.place(3, "a"), Ok(()));
        assert_eq!(store.place(3, "b"), Err("b"));
        assert_eq!(store.place(9, "c"), Err("c"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(3), Some(&"a"));

        assert_eq!(store.take(3), Some("a"));
        assert_eq!(store.take(3), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_swap() {
        let mut store = SlotStore::allocate(3).expect("分配失败");
        store.place(1, 10).expect("槽位应为空");

        let mut item = 20;
        assert!(store.swap(1, &mut item));
        assert_eq!(item, 10);
        assert_eq!(store.get(1), Some(&20));

        // 空槽位不交换
        assert!(!store.swap(0, &mut item));
        assert_eq!(item, 10);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut store = SlotStore::allocate(11).expect("分配失败");
        for i in 0..5 {
            store.place(i * 2, i).expect("槽位应为空");
        }
        store.clear();
        assert_eq!(store.capacity(), 11);
        assert!(store.is_empty());
        assert_eq!(store.iter().count(), 0);
    }

    #[test]
    fn test_iter_in_slot_order() {
        let mut store = SlotStore::allocate(5).expect("分配失败");
        store.place(4, 'c').expect("槽位应为空");
        store.place(0, 'a').expect("槽位应为空");
        store.place(2, 'b').expect("槽位应为空");

        let indexed: Vec<_> = store.iter().collect();
        assert_eq!(indexed, vec![(0, &'a'), (2, &'b'), (4, &'c')]);

    }

    #[test]
    fn test_len_matches_occupied_slots() {
        let mut store = SlotStore::allocate(7).expect("分配失败");
        for i in 0..3 {
            store.place(i, i).expect("槽位应为空");
        }
        // 逐个取出时计数与槽位保持一致
        assert_eq!(store.take(0), Some(0));
        assert_eq!(store.len(), store.iter().count());
        assert_eq!(store.take(0), None);
        assert_eq!(store.len(), 2);
        assert_eq!(store.len(), store.iter().count());

        let mut item = 9;
        assert!(!store.swap(0, &mut item));
        assert!(store.swap(1, &mut item));
        assert_eq!(store.len(), store.iter().count());
    }

    #[test]
    fn test_allocation_failure_reported() {
        let result: Result<SlotStore<u64>, _> = SlotStore::allocate(usize::MAX);
        assert_eq!(result.err(), Some(CuckooError::AllocationFailed { slots: usize::MAX }));
    }
}
