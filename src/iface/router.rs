//! IPv4 router: longest-prefix-match forwarding between owned interfaces

use std::net::Ipv4Addr;

use crate::error::{Error, Result};
use crate::iface::interface::NetworkInterface;
use crate::network::ipv4::Ipv4Datagram;

/// A forwarding rule. Rules are immutable once added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub prefix: u32,
    pub prefix_length: u8,
    /// `None` when the network is directly attached
    pub next_hop: Option<u32>,
    pub interface_num: usize,
}

impl Route {
    fn matches(&self, dst: u32) -> bool {
        let mask = prefix_mask(self.prefix_length);
        (dst & mask) == (self.prefix & mask)
    }
}

/// Mask keeping the top `len` bits; zero for a default route
fn prefix_mask(len: u8) -> u32 {
    u32::MAX.checked_shl(32 - len as u32).unwrap_or(0)
}

#[derive(Debug, Default)]
pub struct Router {
    interfaces: Vec<NetworkInterface>,
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an interface and return its index
    pub fn add_interface(&mut self, iface: NetworkInterface) -> usize {
        self.interfaces.push(iface);
        self.interfaces.len() - 1
    }

    pub fn interface(&self, n: usize) -> Option<&NetworkInterface> {
        self.interfaces.get(n)
    }

    pub fn interface_mut(&mut self, n: usize) -> Option<&mut NetworkInterface> {
        self.interfaces.get_mut(n)
    }

    /// Append a forwarding rule
    ///
    /// `prefix_length` high-order bits of `prefix` must equal the
    /// destination's for the rule to apply.
    pub fn add_route(
        &mut self,
        prefix: u32,
        prefix_length: u8,
        next_hop: Option<u32>,
        interface_num: usize,
    ) -> Result<()> {
        if prefix_length > 32 {
            return Err(Error::InvalidPrefixLength(prefix_length));
        }

        log::debug!(
            "[router] adding route {}/{} => {} on interface {}",
            Ipv4Addr::from(prefix),
            prefix_length,
            next_hop.map_or_else(|| "(direct)".to_string(), |h| Ipv4Addr::from(h).to_string()),
            interface_num
        );

        self.routes.push(Route {
            prefix,
            prefix_length,
            next_hop,
            interface_num,
        });
        Ok(())
    }

    /// Longest matching rule for `dst`; the earliest one wins a tie
    pub fn lookup(&self, dst: u32) -> Option<&Route> {
        let mut best: Option<&Route> = None;
        for route in self.routes.iter().filter(|r| r.matches(dst)) {
            if best.map_or(true, |b| route.prefix_length > b.prefix_length) {
                best = Some(route);
            }
        }
        best
    }

    /// Drain every interface's received datagrams and forward each one
    pub fn route(&mut self) {
        for n in 0..self.interfaces.len() {
            let received = std::mem::take(&mut self.interfaces[n].datagrams_received);
            for dgram in received {
                self.forward(dgram);
            }
        }
    }

    fn forward(&mut self, mut dgram: Ipv4Datagram) {
        let dst = dgram.header.dst;

        let Some(route) = self.lookup(dst).copied() else {
            log::trace!("[router] no route to {}, dropping", Ipv4Addr::from(dst));
            return;
        };

        if dgram.header.ttl <= 1 {
            log::trace!("[router] TTL expired for {}, dropping", Ipv4Addr::from(dst));
            return;
        }

        dgram.header.ttl -= 1;
        dgram.header.compute_checksum();

        let next_hop = route.next_hop.unwrap_or(dst);
        match self.interfaces.get_mut(route.interface_num) {
            Some(iface) => iface.send_datagram(&dgram, next_hop),
            None => log::warn!(
                "[router] route to {} names missing interface {}, dropping",
                Ipv4Addr::from(dst),
                route.interface_num
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::arp::ArpMessage;
    use crate::link::ethernet::{EthernetAddress, EthernetFrame, EthernetHeader};
    use crate::network::ipv4::protocol;

    fn ip(a: u8, b: u8, c: u8, d: u8) -> u32 {
        u32::from_be_bytes([a, b, c, d])
    }

    fn mac(n: u8) -> EthernetAddress {
        EthernetAddress([2, 0, 0, 0, 0, n])
    }

    fn dgram_to(dst: u32, ttl: u8) -> Ipv4Datagram {
        let mut d = Ipv4Datagram::new(protocol::UDP, ip(1, 1, 1, 1), dst, b"x".to_vec()).unwrap();
        d.header.ttl = ttl;
        d.header.compute_checksum();
        d
    }

    /// Router with three interfaces whose neighbours are already resolved
    fn router() -> Router {
        let mut router = Router::new();
        for n in 0..3u8 {
            let mut iface = NetworkInterface::new(format!("eth{n}"), mac(n), ip(10, n, 0, 1));
            for hop in [ip(10, n, 0, 2), ip(10, 0, 5, 1), ip(172, 16, 0, 1)] {
                let reply = ArpMessage {
                    opcode: ArpMessage::OPCODE_REPLY,
                    sender_ethernet_address: mac(100 + n),
                    sender_ip_address: hop,
                    target_ethernet_address: mac(n),
                    target_ip_address: ip(10, n, 0, 1),
                };
                iface.recv_frame(&EthernetFrame {
                    header: EthernetHeader {
                        dst: mac(n),
                        src: mac(100 + n),
                        ether_type: EthernetHeader::TYPE_ARP,
                    },
                    payload: reply.serialize(),
                });
            }
            router.add_interface(iface);
        }
        router
    }

    fn sent(router: &mut Router, n: usize) -> Vec<(EthernetFrame, Ipv4Datagram)> {
        let iface = router.interface_mut(n).unwrap();
        iface
            .output_queue
            .drain(..)
            .map(|f| {
                let d = Ipv4Datagram::parse(&f.payload).unwrap();
                (f, d)
            })
            .collect()
    }

    #[test]
    fn test_prefix_mask() {
        assert_eq!(prefix_mask(0), 0);
        assert_eq!(prefix_mask(8), 0xff00_0000);
        assert_eq!(prefix_mask(32), u32::MAX);
    }

    #[test]
    fn test_add_route_rejects_long_prefix() {
        let mut router = Router::new();
        assert_eq!(
            router.add_route(0, 33, None, 0),
            Err(Error::InvalidPrefixLength(33))
        );
        assert!(router.add_route(0, 32, None, 0).is_ok());
    }

    #[test]
    fn test_longest_prefix_wins() {
        let mut router = router();
        router.add_route(ip(10, 0, 0, 0), 8, Some(ip(172, 16, 0, 1)), 1).unwrap();
        router.add_route(ip(10, 0, 0, 0), 16, None, 2).unwrap();

        router.interface_mut(0).unwrap().datagrams_received.push_back(dgram_to(ip(10, 0, 5, 1), 64));
        router.route();

        assert!(sent(&mut router, 1).is_empty());
        let out = sent(&mut router, 2);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0.header.dst, mac(102));
        assert_eq!(out[0].1.header.ttl, 63);
    }

    #[test]
    fn test_tie_keeps_earliest_rule() {
        let mut router = Router::new();
        router.add_route(ip(10, 0, 0, 0), 8, None, 1).unwrap();
        router.add_route(ip(10, 0, 0, 0), 8, None, 2).unwrap();
        router.add_route(0, 0, None, 0).unwrap();
        assert_eq!(router.lookup(ip(10, 9, 9, 9)).unwrap().interface_num, 1);
        assert_eq!(router.lookup(ip(11, 0, 0, 0)).unwrap().interface_num, 0);
    }

    #[test]
    fn test_no_match_is_dropped() {
        let mut router = router();
        router.add_route(ip(192, 168, 0, 0), 16, None, 1).unwrap();
        router.interface_mut(0).unwrap().datagrams_received.push_back(dgram_to(ip(10, 0, 5, 1), 64));
        router.route();

        assert!(router.interface(0).unwrap().datagrams_received.is_empty());
        for n in 0..3 {
            assert!(sent(&mut router, n).is_empty());
        }
    }

    #[test]
    fn test_ttl_zero_and_one_are_dropped() {
        let mut router = router();
        router.add_route(0, 0, Some(ip(172, 16, 0, 1)), 1).unwrap();
        {
            let q = &mut router.interface_mut(0).unwrap().datagrams_received;
            q.push_back(dgram_to(ip(10, 0, 5, 1), 0));
            q.push_back(dgram_to(ip(10, 0, 5, 1), 1));
            q.push_back(dgram_to(ip(10, 0, 5, 1), 2));
        }
        router.route();

        let out = sent(&mut router, 1);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].1.header.ttl, 1);
    }

    #[test]
    fn test_direct_route_uses_destination_as_next_hop() {
        let mut router = router();
        router.add_route(ip(10, 2, 0, 0), 16, None, 2).unwrap();
        router.interface_mut(1).unwrap().datagrams_received.push_back(dgram_to(ip(10, 2, 0, 9), 64));
        router.route();

        // 10.2.0.9 is not resolved yet: an ARP request for it goes out
        let frames: Vec<EthernetFrame> = router.interface_mut(2).unwrap().output_queue.drain(..).collect();
        assert_eq!(frames.len(), 1);
        let req = ArpMessage::parse(&frames[0].payload).unwrap();
        assert_eq!(req.target_ip_address, ip(10, 2, 0, 9));
    }

    #[test]
    fn test_route_to_missing_interface_is_dropped() {
        let mut router = router();
        router.add_route(0, 0, None, 7).unwrap();
        router.interface_mut(0).unwrap().datagrams_received.push_back(dgram_to(ip(10, 0, 5, 1), 64));
        router.route();
        for n in 0..3 {
            assert!(sent(&mut router, n).is_empty());
        }
    }

    #[test]
    fn test_forwards_in_arrival_order() {
        let mut router = router();
        router.add_route(ip(172, 16, 0, 0), 12, Some(ip(172, 16, 0, 1)), 0).unwrap();
        for host in 1..=3 {
            router
                .interface_mut(1)
                .unwrap()
                .datagrams_received
                .push_back(dgram_to(ip(172, 16, 9, host), 10));
        }
        router.route();

        let dsts: Vec<u32> = sent(&mut router, 0).iter().map(|(_, d)| d.header.dst).collect();
        assert_eq!(dsts, vec![ip(172, 16, 9, 1), ip(172, 16, 9, 2), ip(172, 16, 9, 3)]);
    }
}
