//! Transport layer
//!
//! This module contains the sending half of TCP and the pieces it is built on:
//! - `wrap32`: 32-bit wire sequence numbers
//! - `byte_stream`: the outbound byte stream the sender drains
//! - `message`: sender segments and receiver acknowledgements
//! - `timer`: the retransmission countdown
//! - `sender`: the TCP sender itself

pub mod byte_stream;
pub mod message;
pub mod sender;
pub mod timer;
pub mod wrap32;

pub use byte_stream::{ByteStream, Reader, Writer};
pub use message::{TcpReceiverMessage, TcpSenderMessage};
pub use sender::TcpSender;
pub use wrap32::Wrap32;
