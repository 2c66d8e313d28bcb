//! 内存管理模块 - 槽位数组与素数容量

pub mod prime;
pub mod slot;

pub use prime::{is_prime, next_prime};
pub use slot::SlotStore;
