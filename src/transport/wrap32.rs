//! 32-bit wrapping sequence numbers

/// A sequence number as carried on the wire, relative to some zero point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Wrap32(u32);

const SPAN: u64 = 1 << 32;

impl Wrap32 {
    pub const fn new(raw: u32) -> Self {
        Wrap32(raw)
    }

    /// Wire form of absolute sequence number `n`
    pub fn wrap(n: u64, zero_point: Wrap32) -> Self {
        Wrap32(zero_point.0.wrapping_add(n as u32))
    }

    /// Absolute sequence number that wraps to `self` and lies closest to `checkpoint`
    pub fn unwrap(self, zero_point: Wrap32, checkpoint: u64) -> u64 {
        let offset = self.0.wrapping_sub(zero_point.0) as u64;
        let candidate = (checkpoint & !(SPAN - 1)) | offset;

        let mut best = candidate;
        if let Some(lower) = candidate.checked_sub(SPAN) {
            if checkpoint.abs_diff(lower) < checkpoint.abs_diff(best) {
                best = lower;
            }
        }
        if let Some(upper) = candidate.checked_add(SPAN) {
            if checkpoint.abs_diff(upper) < checkpoint.abs_diff(best) {
                best = upper;
            }
        }
        best
    }
}
