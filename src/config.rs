//! Per-instance configuration for the TCP sender.

use crate::transport::wrap32::Wrap32;

/// Default retransmission timeout before any round has been timed.
pub const DEFAULT_INITIAL_RTO_MS: u64 = 1000;
/// Largest payload carried by a single segment.
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 1000;

/// Adjustable sender parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpConfig {
    /// Initial sequence number; the SYN occupies this value.
    pub isn: Wrap32,
    /// RTO used for the first round and restored on every forward-moving ack.
    pub initial_rto_ms: u64,
    /// Upper bound on payload bytes per segment.
    pub max_payload_size: usize,
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            isn: Wrap32::new(0),
            initial_rto_ms: DEFAULT_INITIAL_RTO_MS,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
        }
    }
}
