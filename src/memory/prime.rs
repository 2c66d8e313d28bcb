//! 素数工具 - 保证槽位数组长度为素数
//!
//! 容量为素数时，取模映射不会因乘法/多项式哈希的周期性而偏向部分槽位。

/// 判断是否为素数
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    // 6k ± 1
    let mut i = 5usize;
    while i <= n / i {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// 不小于 `n` 的最小素数，溢出时返回 `None`
pub fn next_prime(n: usize) -> Option<usize> {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate = candidate.checked_add(1)?;
    }
    Some(candidate)
}
