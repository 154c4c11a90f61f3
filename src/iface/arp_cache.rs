//! Address resolution state owned by one interface
//!
//! Three per-IP tables, all keyed by the numeric IPv4 address:
//! - learned IP→MAC bindings, each with a remaining lifetime
//! - datagrams waiting for a binding, in enqueue order
//! - request suppression timers; an entry exists while a request is outstanding
//!
//! Time only moves through [`AddressResolutionCache::tick`]. Entries are
//! evicted when their remaining lifetime reaches exactly zero.

use std::collections::{HashMap, VecDeque};

use crate::link::ethernet::EthernetAddress;
use crate::network::ipv4::Ipv4Datagram;

/// Lifetime of a learned binding
pub const ARP_ENTRY_TTL_MS: u64 = 30_000;
/// Window during which a second request for the same IP is suppressed
pub const ARP_REQUEST_COOLDOWN_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheEntry {
    mac: EthernetAddress,
    ttl_ms: u64,
}

#[derive(Debug, Default)]
pub struct AddressResolutionCache {
    entries: HashMap<u32, CacheEntry>,
    pending: HashMap<u32, VecDeque<Ipv4Datagram>>,
    request_timers: HashMap<u32, u64>,
}

impl AddressResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, ip: u32) -> Option<EthernetAddress> {
        self.entries.get(&ip).map(|e| e.mac)
    }

    /// Insert or refresh a binding with a full lifetime
    pub fn learn(&mut self, ip: u32, mac: EthernetAddress) {
        self.entries.insert(
            ip,
            CacheEntry {
                mac,
                ttl_ms: ARP_ENTRY_TTL_MS,
            },
        );
    }

    /// Queue a datagram for `ip`.
    ///
    /// Returns `true` when no request is outstanding for `ip`; the caller must
    /// then broadcast one. The suppression timer is started here.
    pub fn enqueue(&mut self, ip: u32, dgram: Ipv4Datagram) -> bool {
        self.pending.entry(ip).or_default().push_back(dgram);

        if self.request_timers.contains_key(&ip) {
            return false;
        }
        self.request_timers.insert(ip, ARP_REQUEST_COOLDOWN_MS);
        true
    }

    /// Remove everything waiting on `ip` and cancel its request timer
    pub fn take_pending(&mut self, ip: u32) -> VecDeque<Ipv4Datagram> {
        self.request_timers.remove(&ip);
        self.pending.remove(&ip).unwrap_or_default()
    }

    pub fn request_outstanding(&self, ip: u32) -> bool {
        self.request_timers.contains_key(&ip)
    }

    pub fn pending_len(&self, ip: u32) -> usize {
        self.pending.get(&ip).map_or(0, VecDeque::len)
    }

    /// Age every binding and request timer by `ms`, evicting those that hit zero
    pub fn tick(&mut self, ms: u64) {
        self.entries.retain(|ip, entry| {
            if entry.ttl_ms <= ms {
                log::trace!("[arp] expire {}", std::net::Ipv4Addr::from(*ip));
                return false;
            }
            entry.ttl_ms -= ms;
            true
        });

        // Queued datagrams stay; the next send to that IP issues a fresh request.
        self.request_timers.retain(|_, remaining| {
            if *remaining <= ms {
                return false;
            }
            *remaining -= ms;
            true
        });
    }
}
