//! Wrapping sequence numbers.
//!
//! Every stream (moves, acks, requests, replication deltas) counts with `wrapping_add`, so
//! ordering is decided by serial-number arithmetic: `a` is newer than `b` when it lies less
//! than half the `u32` range ahead of it.

/// True when `seq` comes after `than`, across the `u32::MAX -> 0` wrap.
pub fn is_newer(seq: u32, than: u32) -> bool {
    (seq.wrapping_sub(than) as i32) > 0
}

/// True when `seq` was already seen given the last accepted sequence.
pub fn is_stale(seq: u32, last: Option<u32>) -> bool {
    last.is_some_and(|last| !is_newer(seq, last))
}
