//! Tree depth arithmetic for the implied balanced tree

/// Largest number of leaves an accumulator may hold. Tree positions stay
/// inside `u64` for every node of a tree this size.
pub const MAX_NODE_COUNT: u64 = 1 << 63;

/// Smallest power of two that is `>= value`, or `None` if it does not fit
/// in a `u64`.
///
/// `value` is expected to be at least 1; `0` maps to `1`.
pub const fn next_power_of_2(value: u64) -> Option<u64> {
    value.checked_next_power_of_two()
}

/// Number of layers (leaf layer = 1) of the smallest balanced tree holding
/// `node_count` leaves.
pub const fn max_depth(node_count: u64) -> u32 {
    if node_count == 0 {
        return 0;
    }
    // bit length of `node_count - 1` is the log2 of the next power of two
    u64::BITS - (node_count - 1).leading_zeros() + 1
}

/// Length of a well-formed frontier after `node_count` appends.
///
/// One digest per fully realized subtree plus the trailing root, except that
/// for a power of two the single realized subtree *is* the root.
pub const fn frontier_len(node_count: u64) -> usize {
    match node_count {
        0 => 0,
        n if n.is_power_of_two() => 1,
        n => n.count_ones() as usize + 1,
    }
}
