//! Error types shared by the wire codecs and the routing table.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("packet too short: need {need} bytes, got {got}")]
    Truncated { need: usize, got: usize },
    #[error("unsupported IP version {0}")]
    UnsupportedVersion(u8),
    #[error("invalid IPv4 header length {0}")]
    BadHeaderLength(usize),
    #[error("IPv4 total length {0} is inconsistent with the buffer")]
    BadTotalLength(usize),
    #[error("IPv4 header checksum mismatch: carried {carried:#06x}, computed {computed:#06x}")]
    BadChecksum { carried: u16, computed: u16 },
    #[error("payload of {0} bytes does not fit in an IPv4 datagram")]
    PayloadTooLarge(usize),
    #[error("unsupported ARP hardware/protocol combination")]
    UnsupportedArp,
    #[error("unknown ARP opcode {0}")]
    UnknownOpcode(u16),
    #[error("prefix length {0} exceeds 32")]
    InvalidPrefixLength(u8),
}

pub type Result<T> = core::result::Result<T, Error>;
