//! A small user-space TCP/IP stack in Rust
//!
//! This library provides three layered pieces:
//! - ARP address resolution on an Ethernet interface
//! - IPv4 forwarding with a longest-prefix-match routing table
//! - A TCP sender with retransmission and receiver flow control
//!
//! Everything is synchronous and driven by explicit `tick` calls; no
//! component starts threads or timers of its own.

pub mod config;
pub mod error;
pub mod iface;
pub mod link;
pub mod network;
pub mod transport;

// Re-export commonly used types
pub use config::TcpConfig;
pub use error::{Error, Result};
pub use iface::{NetworkInterface, Router};
pub use link::{ArpMessage, EthernetAddress, EthernetFrame, EthernetHeader, ETHERNET_BROADCAST};
pub use network::{Ipv4Datagram, Ipv4Header};
pub use transport::{ByteStream, TcpReceiverMessage, TcpSender, TcpSenderMessage, Wrap32};
