//! Network interface: Ethernet framing around IPv4 and ARP
//!
//! This module provides the link-facing side of the stack, including:
//! - Encapsulating outbound datagrams once the next hop's MAC is known
//! - Queuing datagrams behind an ARP request when it is not
//! - Learning bindings from every ARP message seen, and answering requests
//! - Queuing inbound IPv4 datagrams for the layer above

use std::collections::VecDeque;
use std::net::Ipv4Addr;

use crate::error::Result;
use crate::iface::arp_cache::AddressResolutionCache;
use crate::link::arp::ArpMessage;
use crate::link::ethernet::{EthernetAddress, EthernetFrame, EthernetHeader, ETHERNET_BROADCAST};
use crate::network::ipv4::Ipv4Datagram;

/// One Ethernet-attached IPv4 interface
#[derive(Debug)]
pub struct NetworkInterface {
    name: String,
    ethernet_address: EthernetAddress,
    ip_address: u32,
    arp: AddressResolutionCache,
    /// Frames handed to the link, oldest first
    pub output_queue: VecDeque<EthernetFrame>,
    /// IPv4 datagrams received for the layer above, oldest first
    pub datagrams_received: VecDeque<Ipv4Datagram>,
}

impl NetworkInterface {
    pub fn new(name: impl Into<String>, ethernet_address: EthernetAddress, ip_address: u32) -> Self {
        let name = name.into();
        log::debug!(
            "[iface] {} has Ethernet address {} and IP address {}",
            name,
            ethernet_address,
            Ipv4Addr::from(ip_address)
        );
        NetworkInterface {
            name,
            ethernet_address,
            ip_address,
            arp: AddressResolutionCache::new(),
            output_queue: VecDeque::new(),
            datagrams_received: VecDeque::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ethernet_address(&self) -> EthernetAddress {
        self.ethernet_address
    }

    pub fn ip_address(&self) -> u32 {
        self.ip_address
    }

    /// Cached hardware address for `ip`, if a live binding exists
    pub fn cached_address(&self, ip: u32) -> Option<EthernetAddress> {
        self.arp.lookup(ip)
    }

    /// Whether an ARP request for `ip` is still inside its suppression window
    pub fn request_outstanding(&self, ip: u32) -> bool {
        self.arp.request_outstanding(ip)
    }

    /// Send an IPv4 datagram towards `next_hop`
    ///
    /// `next_hop` is the numeric address of the neighbour to hand the
    /// datagram to: a router, or the destination itself when it is on-link.
    pub fn send_datagram(&mut self, dgram: &Ipv4Datagram, next_hop: u32) {
        if let Some(mac) = self.arp.lookup(next_hop) {
            self.transmit(mac, EthernetHeader::TYPE_IPV4, dgram.serialize());
            return;
        }

        if self.arp.enqueue(next_hop, dgram.clone()) {
            log::debug!(
                "[arp] {}: who-has {} tell {}",
                self.name,
                Ipv4Addr::from(next_hop),
                Ipv4Addr::from(self.ip_address)
            );
            let request = ArpMessage::request(self.ethernet_address, self.ip_address, next_hop);
            self.transmit(ETHERNET_BROADCAST, EthernetHeader::TYPE_ARP, request.serialize());
        } else {
            log::trace!(
                "[arp] {}: request for {} outstanding, queued ({} waiting)",
                self.name,
                Ipv4Addr::from(next_hop),
                self.arp.pending_len(next_hop)
            );
        }
    }

    /// Process one inbound frame
    pub fn recv_frame(&mut self, frame: &EthernetFrame) {
        if !self.is_for_us(&frame.header.dst) {
            return;
        }

        match frame.header.ether_type {
            EthernetHeader::TYPE_IPV4 => match Ipv4Datagram::parse(&frame.payload) {
                Ok(dgram) => self.datagrams_received.push_back(dgram),
                Err(e) => log::debug!("[iface] {}: dropping IPv4 payload: {}", self.name, e),
            },
            EthernetHeader::TYPE_ARP => match ArpMessage::parse(&frame.payload) {
                Ok(msg) => self.process_arp(&msg),
                Err(e) => log::debug!("[arp] {}: dropping message: {}", self.name, e),
            },
            other => log::trace!("[iface] {}: ignoring EtherType {:#06x}", self.name, other),
        }
    }

    /// Parse raw link bytes and process them as a frame
    pub fn recv_frame_bytes(&mut self, data: &[u8]) -> Result<()> {
        let frame = EthernetFrame::parse(data)?;
        self.recv_frame(&frame);
        Ok(())
    }

    /// Advance ARP time by `ms_since_last_tick` milliseconds
    pub fn tick(&mut self, ms_since_last_tick: u64) {
        self.arp.tick(ms_since_last_tick);
    }

    /// Get the next frame to put on the wire
    pub fn pop_frame(&mut self) -> Option<EthernetFrame> {
        self.output_queue.pop_front()
    }

    /// Get the next received datagram
    pub fn pop_datagram(&mut self) -> Option<Ipv4Datagram> {
        self.datagrams_received.pop_front()
    }

    fn process_arp(&mut self, msg: &ArpMessage) {
        let sender_ip = msg.sender_ip_address;
        let sender_mac = msg.sender_ethernet_address;

        // Every message teaches us the sender's binding, asked for or not
        self.arp.learn(sender_ip, sender_mac);
        log::trace!(
            "[arp] {}: learned {} is-at {}",
            self.name,
            Ipv4Addr::from(sender_ip),
            sender_mac
        );

        if msg.is_request() && msg.target_ip_address == self.ip_address {
            let reply = ArpMessage::reply_to(msg, self.ethernet_address, self.ip_address);
            self.transmit(sender_mac, EthernetHeader::TYPE_ARP, reply.serialize());
        }

        let pending = self.arp.take_pending(sender_ip);
        if !pending.is_empty() {
            log::debug!(
                "[arp] {}: flushing {} datagram(s) to {}",
                self.name,
                pending.len(),
                Ipv4Addr::from(sender_ip)
            );
        }
        for dgram in pending {
            self.transmit(sender_mac, EthernetHeader::TYPE_IPV4, dgram.serialize());
        }
    }

    fn transmit(&mut self, dst: EthernetAddress, ether_type: u16, payload: Vec<u8>) {
        self.output_queue.push_back(EthernetFrame {
            header: EthernetHeader {
                dst,
                src: self.ethernet_address,
                ether_type,
            },
            payload,
        });
    }

    /// Check if a frame is addressed to this interface
    fn is_for_us(&self, dst: &EthernetAddress) -> bool {
        *dst == self.ethernet_address || dst.is_broadcast()
    }
}
