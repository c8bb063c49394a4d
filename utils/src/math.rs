//! Power-of-two arithmetic used to place data on square and tree boundaries.

/// Returns true if `n` is a (non-zero) power of two.
pub fn is_power_of_two(n: usize) -> bool {
    n != 0 && n & (n - 1) == 0
}

/// Returns the smallest power of two that is greater than or equal to `n`.
///
/// `0` and `1` both round up to `1`.
pub fn round_up_power_of_two(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Returns the largest power of two that is less than or equal to `n`, or `None` if `n` is zero.
pub fn round_down_power_of_two(n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }
    Some(1 << (usize::BITS - 1 - n.leading_zeros()))
}

/// Returns the largest power of two strictly less than `n` (the split point of an RFC-6962 tree
/// with `n` leaves). Returns `0` for `n < 2`.
pub fn split_point(n: usize) -> usize {
    match n {
        0 | 1 => 0,
        _ => round_up_power_of_two(n) >> 1,
    }
}

/// Returns `log2(n)` for a power of two `n`, or `None` otherwise.
pub fn log2(n: usize) -> Option<usize> {
    if !is_power_of_two(n) {
        return None;
    }
    Some(n.trailing_zeros() as usize)
}

/// Returns the smallest `s` such that `s * s >= n`.
pub fn ceil_sqrt(n: usize) -> usize {
    if n < 2 {
        return n;
    }

    // Newton iteration on integers converges to floor(sqrt(n))
    let mut x = n;
    let mut y = n / 2 + n % 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    if x * x == n {
        x
    } else {
        x + 1
    }
}

/// Rounds `cursor` up to the next multiple of `v`. A `v` of zero leaves `cursor` unchanged.
pub fn round_up_by(cursor: usize, v: usize) -> usize {
    if v == 0 {
        return cursor;
    }
    match cursor % v {
        0 => cursor,
        rem => cursor + (v - rem),
    }
}
