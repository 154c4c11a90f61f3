//! IPv4 protocol implementation
//!
//! This module provides IPv4 header parsing and serialization, plus the
//! datagram type the interface queues and the router forwards.
//!
//! Features:
//! - Header parsing with version, length and checksum validation
//! - Options are carried through untouched so forwarding stays bit-exact
//! - Checksum recomputation after TTL changes

use crate::error::{Error, Result};
use crate::network::checksum;
use byteorder::{BigEndian, ByteOrder};

pub const IPV4_HEADER_LEN: usize = 20;
const IPV4_VERSION: u8 = 4;
const DEFAULT_IHL: u8 = 5; // 5 * 4 = 20 bytes (standard header length)
pub const DEFAULT_TTL: u8 = 64;

/// IPv4 packet header structure
///
/// Represents the IPv4 header as defined in RFC 791. Addresses are kept as
/// numeric host-order values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Header {
    pub version: u8,
    pub ihl: u8, // Internet Header Length, in 32-bit words
    pub tos: u8, // Type of Service
    pub total_len: u16,
    pub id: u16,
    pub flags_frag_offset: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub checksum: u16,
    pub src: u32,
    pub dst: u32,
    pub options: Vec<u8>,
}

impl Ipv4Header {
    /// Create a header for a payload of `payload_len` bytes with a valid checksum
    ///
    /// Fails when header plus payload does not fit the 16-bit total length.
    pub fn new_simple(protocol: u8, src: u32, dst: u32, payload_len: usize) -> Result<Self> {
        let total_len = u16::try_from(IPV4_HEADER_LEN + payload_len)
            .map_err(|_| Error::PayloadTooLarge(payload_len))?;
        let mut header = Ipv4Header {
            version: IPV4_VERSION,
            ihl: DEFAULT_IHL,
            tos: 0,
            total_len,
            id: 0,
            flags_frag_offset: 0,
            ttl: DEFAULT_TTL,
            protocol,
            checksum: 0,
            src,
            dst,
            options: Vec::new(),
        };
        header.compute_checksum();
        Ok(header)
    }

    /// Parse IPv4 header from byte slice
    ///
    /// Rejects anything that is not version 4, has an IHL below 5, claims
    /// more bytes than are present, or carries a wrong checksum.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < IPV4_HEADER_LEN {
            return Err(Error::Truncated {
                need: IPV4_HEADER_LEN,
                got: data.len(),
            });
        }

        let version = data[0] >> 4;
        if version != IPV4_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let ihl = data[0] & 0x0F;
        let header_len = ihl as usize * 4;
        if ihl < DEFAULT_IHL || header_len > data.len() {
            return Err(Error::BadHeaderLength(header_len));
        }

        let total_len = BigEndian::read_u16(&data[2..4]);
        if (total_len as usize) < header_len || total_len as usize > data.len() {
            return Err(Error::BadTotalLength(total_len as usize));
        }

        let header = Ipv4Header {
            version,
            ihl,
            tos: data[1],
            total_len,
            id: BigEndian::read_u16(&data[4..6]),
            flags_frag_offset: BigEndian::read_u16(&data[6..8]),
            ttl: data[8],
            protocol: data[9],
            checksum: BigEndian::read_u16(&data[10..12]),
            src: BigEndian::read_u32(&data[12..16]),
            dst: BigEndian::read_u32(&data[16..20]),
            options: data[IPV4_HEADER_LEN..header_len].to_vec(),
        };

        let computed = header.calculate_checksum();
        if computed != header.checksum {
            return Err(Error::BadChecksum {
                carried: header.checksum,
                computed,
            });
        }

        Ok(header)
    }

    /// Convert IPv4 header to bytes, options included
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; IPV4_HEADER_LEN];
        bytes[0] = (self.version << 4) | self.ihl;
        bytes[1] = self.tos;
        BigEndian::write_u16(&mut bytes[2..4], self.total_len);
        BigEndian::write_u16(&mut bytes[4..6], self.id);
        BigEndian::write_u16(&mut bytes[6..8], self.flags_frag_offset);
        bytes[8] = self.ttl;
        bytes[9] = self.protocol;
        BigEndian::write_u16(&mut bytes[10..12], self.checksum);
        BigEndian::write_u32(&mut bytes[12..16], self.src);
        BigEndian::write_u32(&mut bytes[16..20], self.dst);
        bytes.extend_from_slice(&self.options);
        bytes
    }

    /// Checksum of this header with the checksum field treated as zero
    pub fn calculate_checksum(&self) -> u16 {
        let mut bytes = self.to_bytes();
        bytes[10] = 0;
        bytes[11] = 0;
        checksum(&bytes)
    }

    /// Recalculate and store the checksum. Call after modifying any field.
    pub fn compute_checksum(&mut self) {
        self.checksum = self.calculate_checksum();
    }

    /// Get the header length in bytes
    pub fn header_len(&self) -> usize {
        (self.ihl as usize) * 4
    }
}

/// An IPv4 header together with its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Datagram {
    pub header: Ipv4Header,
    pub payload: Vec<u8>,
}

impl Ipv4Datagram {
    /// Build a datagram around `payload` with default header fields
    pub fn new(protocol: u8, src: u32, dst: u32, payload: Vec<u8>) -> Result<Self> {
        let header = Ipv4Header::new_simple(protocol, src, dst, payload.len())?;
        Ok(Ipv4Datagram { header, payload })
    }

    /// Parse a datagram; bytes past `total_len` (link padding) are dropped
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = Ipv4Header::from_bytes(data)?;
        let payload = data[header.header_len()..header.total_len as usize].to_vec();
        Ok(Ipv4Datagram { header, payload })
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = self.header.to_bytes();
        bytes.extend_from_slice(&self.payload);
        bytes
    }
}

/// IPv4 protocol constants
pub mod protocol {
    pub const ICMP: u8 = 1;
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;
}
