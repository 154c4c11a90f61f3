//! Network interface abstraction layer
//!
//! This module provides the Ethernet-facing half of the stack:
//! - ARP cache with per-target pending queues
//! - Interface send/receive/tick
//! - Longest-prefix-match router over a set of interfaces

pub mod arp_cache;
pub mod interface;
pub mod router;

pub use arp_cache::{AddressResolutionCache, ARP_ENTRY_TTL_MS, ARP_REQUEST_COOLDOWN_MS};
pub use interface::NetworkInterface;
pub use router::{Route, Router};
