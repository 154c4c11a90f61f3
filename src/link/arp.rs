//! ARP (Address Resolution Protocol) messages for Ethernet/IPv4
//!
//! Only the Ethernet hardware type with IPv4 protocol addresses is
//! supported; anything else is rejected at parse time.

use crate::error::{Error, Result};
use crate::link::ethernet::EthernetAddress;
use byteorder::{BigEndian, ByteOrder};

const ARP_HTYPE_ETHERNET: u16 = 1;
const ARP_PTYPE_IPV4: u16 = 0x0800;
const ARP_HLEN_ETH: u8 = 6;
const ARP_PLEN_IPV4: u8 = 4;

mod field {
    pub type Field = core::ops::Range<usize>;

    pub const HTYPE: Field = 0..2;
    pub const PTYPE: Field = 2..4;
    pub const HLEN: usize = 4;
    pub const PLEN: usize = 5;
    pub const OPER: Field = 6..8;
    pub const SHA: Field = 8..14;
    pub const SPA: Field = 14..18;
    pub const THA: Field = 18..24;
    pub const TPA: Field = 24..28;
}

pub const ARP_MESSAGE_LEN: usize = field::TPA.end;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpMessage {
    pub opcode: u16,
    pub sender_ethernet_address: EthernetAddress,
    pub sender_ip_address: u32,
    pub target_ethernet_address: EthernetAddress,
    pub target_ip_address: u32,
}

impl ArpMessage {
    pub const OPCODE_REQUEST: u16 = 1;
    pub const OPCODE_REPLY: u16 = 2;

    /// Broadcast query for the hardware address owning `target_ip`
    pub fn request(sender_mac: EthernetAddress, sender_ip: u32, target_ip: u32) -> Self {
        ArpMessage {
            opcode: Self::OPCODE_REQUEST,
            sender_ethernet_address: sender_mac,
            sender_ip_address: sender_ip,
            target_ethernet_address: EthernetAddress::default(),
            target_ip_address: target_ip,
        }
    }

    /// Answer to `request`, announcing `our_mac` as the owner of `our_ip`
    pub fn reply_to(request: &ArpMessage, our_mac: EthernetAddress, our_ip: u32) -> Self {
        ArpMessage {
            opcode: Self::OPCODE_REPLY,
            sender_ethernet_address: our_mac,
            sender_ip_address: our_ip,
            target_ethernet_address: request.sender_ethernet_address,
            target_ip_address: request.sender_ip_address,
        }
    }

    pub fn is_request(&self) -> bool {
        self.opcode == Self::OPCODE_REQUEST
    }

    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < ARP_MESSAGE_LEN {
            return Err(Error::Truncated {
                need: ARP_MESSAGE_LEN,
                got: data.len(),
            });
        }

        if BigEndian::read_u16(&data[field::HTYPE]) != ARP_HTYPE_ETHERNET
            || BigEndian::read_u16(&data[field::PTYPE]) != ARP_PTYPE_IPV4
            || data[field::HLEN] != ARP_HLEN_ETH
            || data[field::PLEN] != ARP_PLEN_IPV4
        {
            return Err(Error::UnsupportedArp);
        }

        let opcode = BigEndian::read_u16(&data[field::OPER]);
        if opcode != Self::OPCODE_REQUEST && opcode != Self::OPCODE_REPLY {
            return Err(Error::UnknownOpcode(opcode));
        }

        let mut sha = [0u8; 6];
        let mut tha = [0u8; 6];
        sha.copy_from_slice(&data[field::SHA]);
        tha.copy_from_slice(&data[field::THA]);

        Ok(ArpMessage {
            opcode,
            sender_ethernet_address: EthernetAddress(sha),
            sender_ip_address: BigEndian::read_u32(&data[field::SPA]),
            target_ethernet_address: EthernetAddress(tha),
            target_ip_address: BigEndian::read_u32(&data[field::TPA]),
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = vec![0u8; ARP_MESSAGE_LEN];
        BigEndian::write_u16(&mut buf[field::HTYPE], ARP_HTYPE_ETHERNET);
        BigEndian::write_u16(&mut buf[field::PTYPE], ARP_PTYPE_IPV4);
        buf[field::HLEN] = ARP_HLEN_ETH;
        buf[field::PLEN] = ARP_PLEN_IPV4;
        BigEndian::write_u16(&mut buf[field::OPER], self.opcode);
        buf[field::SHA].copy_from_slice(&self.sender_ethernet_address.0);
        BigEndian::write_u32(&mut buf[field::SPA], self.sender_ip_address);
        buf[field::THA].copy_from_slice(&self.target_ethernet_address.0);
        BigEndian::write_u32(&mut buf[field::TPA], self.target_ip_address);
        buf
    }
}
