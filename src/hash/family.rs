//! 哈希函数族特征

/// 一组 `k` 个（`k >= 2`）哈希函数
///
/// 表只调用这些方法，从不构造具体的哈希函数。
/// 同一代函数族中，`hash(x, which)` 对固定的 `x` 和 `which` 必须是确定的。
///
/// 重哈希前表会调用 `snapshot`，插入最终失败时用 `restore` 回到该状态。
/// 内部通过 `Rc`/`Arc` 共享状态的函数族必须在 `restore` 中写回共享状态，
/// 否则旧槽位数组中的键将无法再被找到。
pub trait HashFamily<K: ?Sized> {
    /// 回滚所需的状态
    type Snapshot;

    /// 用第 `which` 个函数计算哈希值，`which < self.count()`
    ///
    /// 返回值可以为负，由表负责取非负余数。
    fn hash(&self, key: &K, which: usize) -> i64;

    /// 函数个数
    fn count(&self) -> usize;

    /// 替换为一组新的（尽量独立的）函数，用于打破踢出循环
    fn regenerate(&mut self);

    /// 记录当前这一代函数
    fn snapshot(&self) -> Self::Snapshot;

    /// 恢复到 `snapshot` 记录的那一代函数
    fn restore(&mut self, snapshot: Self::Snapshot);
}
