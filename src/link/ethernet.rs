//! Ethernet II framing
//!
//! Frames carry a 14-byte header (destination, source, EtherType) followed
//! by the payload. Only the IPv4 and ARP EtherTypes are interpreted.

use std::fmt;

use crate::error::{Error, Result};
use byteorder::{BigEndian, ByteOrder};

pub const ETHERNET_HEADER_LEN: usize = 14;

/// A 48-bit hardware address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EthernetAddress(pub [u8; 6]);

pub const ETHERNET_BROADCAST: EthernetAddress = EthernetAddress([0xff; 6]);

impl EthernetAddress {
    pub fn is_broadcast(&self) -> bool {
        *self == ETHERNET_BROADCAST
    }
}

impl fmt::Display for EthernetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    pub dst: EthernetAddress,
    pub src: EthernetAddress,
    pub ether_type: u16,
}

impl EthernetHeader {
    pub const TYPE_IPV4: u16 = 0x0800;
    pub const TYPE_ARP: u16 = 0x0806;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < ETHERNET_HEADER_LEN {
            return Err(Error::Truncated {
                need: ETHERNET_HEADER_LEN,
                got: data.len(),
            });
        }

        let mut dst = [0u8; 6];
        let mut src = [0u8; 6];
        dst.copy_from_slice(&data[0..6]);
        src.copy_from_slice(&data[6..12]);

        Ok(EthernetHeader {
            dst: EthernetAddress(dst),
            src: EthernetAddress(src),
            ether_type: BigEndian::read_u16(&data[12..14]),
        })
    }

    pub fn to_bytes(&self) -> [u8; ETHERNET_HEADER_LEN] {
        let mut bytes = [0u8; ETHERNET_HEADER_LEN];
        bytes[0..6].copy_from_slice(&self.dst.0);
        bytes[6..12].copy_from_slice(&self.src.0);
        BigEndian::write_u16(&mut bytes[12..14], self.ether_type);
        bytes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetFrame {
    pub header: EthernetHeader,
    pub payload: Vec<u8>,
}

impl EthernetFrame {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = EthernetHeader::from_bytes(data)?;
        Ok(EthernetFrame {
            header,
            payload: data[ETHERNET_HEADER_LEN..].to_vec(),
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(ETHERNET_HEADER_LEN + self.payload.len());
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.extend_from_slice(&self.payload);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_layout() {
        let frame = EthernetFrame {
            header: EthernetHeader {
                dst: ETHERNET_BROADCAST,
                src: EthernetAddress([2, 0, 0, 0, 0, 1]),
                ether_type: EthernetHeader::TYPE_ARP,
            },
            payload: vec![0xaa, 0xbb],
        };
        let bytes = frame.serialize();
        assert_eq!(&bytes[0..6], &[0xff; 6]);
        assert_eq!(&bytes[6..12], &[2, 0, 0, 0, 0, 1]);
        assert_eq!(&bytes[12..14], &[0x08, 0x06]);
        assert_eq!(EthernetFrame::parse(&bytes).unwrap(), frame);
    }

    #[test]
    fn test_short_frame() {
        assert_eq!(
            EthernetFrame::parse(&[0; 13]),
            Err(Error::Truncated { need: 14, got: 13 })
        );
    }

    #[test]
    fn test_display() {
        let addr = EthernetAddress([0x02, 0x00, 0x5e, 0x10, 0xab, 0x01]);
        assert_eq!(addr.to_string(), "02:00:5e:10:ab:01");
        assert!(ETHERNET_BROADCAST.is_broadcast());
    }
}
