//! Link layer protocols
//!
//! - Ethernet: frame header and addressing
//! - ARP: address resolution messages carried in Ethernet frames

pub mod arp;
pub mod ethernet;

pub use arp::ArpMessage;
pub use ethernet::{EthernetAddress, EthernetFrame, EthernetHeader, ETHERNET_BROADCAST};
