//! Messages exchanged between the TCP sender and its peer's receiver

use crate::transport::wrap32::Wrap32;

/// Segment emitted by the sender
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TcpSenderMessage {
    pub seqno: Wrap32,
    pub syn: bool,
    pub payload: Vec<u8>,
    pub fin: bool,
    pub rst: bool,
}

impl TcpSenderMessage {
    /// Sequence space occupied: SYN and FIN count one each
    pub fn sequence_length(&self) -> u64 {
        self.syn as u64 + self.payload.len() as u64 + self.fin as u64
    }
}

/// Acknowledgement and flow-control window reported by the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TcpReceiverMessage {
    pub ackno: Option<Wrap32>,
    pub window_size: u16,
    pub rst: bool,
}
