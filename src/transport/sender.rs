//! TCP sender
//!
//! Turns an outbound byte stream into segments that respect the receiver's
//! advertised window, keeps every unacknowledged segment until it is
//! covered by an ack, and retransmits the oldest one when the timer fires.
//!
//! ```text
//!  acked floor        next to send
//!      │                   │
//!  ────┼───────────────────┼───────────────▶ absolute seq space
//!      │<--- in flight --->│<-- window -->
//! ```
//!
//! SYN occupies the first sequence number and FIN the one after the last
//! payload byte. A zero window is treated as one sequence number wide at a
//! time and does not back the timer off.

use std::collections::VecDeque;

use crate::config::TcpConfig;
use crate::transport::byte_stream::{Reader, Writer};
use crate::transport::message::{TcpReceiverMessage, TcpSenderMessage};
use crate::transport::timer::RetransmitTimer;
use crate::transport::wrap32::Wrap32;

#[derive(Debug, Clone)]
struct Outstanding {
    abs_seqno: u64,
    message: TcpSenderMessage,
}

impl Outstanding {
    fn end(&self) -> u64 {
        self.abs_seqno + self.message.sequence_length()
    }
}

#[derive(Debug)]
pub struct TcpSender<S> {
    input: S,
    isn: Wrap32,
    initial_rto_ms: u64,
    max_payload_size: usize,

    abs_sender_num: u64,
    abs_acked_num: u64,
    in_flight: u64,
    window_size: u16,
    fin_sent: bool,

    outstanding: VecDeque<Outstanding>,
    timer: RetransmitTimer,
}

impl<S: Reader + Writer> TcpSender<S> {
    pub fn new(input: S, config: &TcpConfig) -> Self {
        TcpSender {
            input,
            isn: config.isn,
            initial_rto_ms: config.initial_rto_ms,
            max_payload_size: config.max_payload_size,
            abs_sender_num: 0,
            abs_acked_num: 0,
            in_flight: 0,
            // Until the peer speaks, assume room for the SYN only
            window_size: 1,
            fin_sent: false,
            outstanding: VecDeque::new(),
            timer: RetransmitTimer::new(config.initial_rto_ms),
        }
    }

    /// Sequence numbers sent but not yet acknowledged
    pub fn sequence_numbers_in_flight(&self) -> u64 {
        self.in_flight
    }

    pub fn consecutive_retransmissions(&self) -> u64 {
        self.timer.consecutive_retransmissions()
    }

    /// The owned outbound stream
    pub fn input(&self) -> &S {
        &self.input
    }

    /// The application writes outbound bytes and closes the stream through this
    pub fn input_mut(&mut self) -> &mut S {
        &mut self.input
    }

    /// Zero-length segment at the current sequence number, for pure acks
    pub fn make_empty_message(&self) -> TcpSenderMessage {
        TcpSenderMessage {
            seqno: Wrap32::wrap(self.abs_sender_num, self.isn),
            rst: self.input.has_error(),
            ..Default::default()
        }
    }

    /// Send as much as the window allows
    ///
    /// # Panics
    ///
    /// If the stream reports buffered bytes but `peek` yields nothing.
    pub fn push<F: FnMut(&TcpSenderMessage)>(&mut self, mut transmit: F) {
        if self.input.has_error() {
            return;
        }

        // A closed window still admits one sequence number
        let window = u64::from(self.window_size.max(1));

        while self.in_flight < window && !self.fin_sent {
            let room = window - self.in_flight;
            let syn = self.abs_sender_num == 0;

            let budget = (room - syn as u64).min(self.max_payload_size as u64);
            let payload = self.read_up_to(budget);

            let mut message = TcpSenderMessage {
                seqno: Wrap32::wrap(self.abs_sender_num, self.isn),
                syn,
                payload,
                fin: false,
                rst: false,
            };
            if self.input.is_finished() && message.sequence_length() < room {
                message.fin = true;
            }

            if message.sequence_length() == 0 {
                break;
            }

            log::trace!(
                "[tcp] -> seq={} len={} syn={} fin={} in_flight={}",
                self.abs_sender_num,
                message.sequence_length(),
                message.syn,
                message.fin,
                self.in_flight
            );

            transmit(&message);
            self.fin_sent = message.fin;
            let len = message.sequence_length();
            self.outstanding.push_back(Outstanding {
                abs_seqno: self.abs_sender_num,
                message,
            });
            self.abs_sender_num += len;
            self.in_flight += len;

            if !self.timer.is_running() {
                self.timer.start(self.timer.rto_ms());
            }
        }
    }

    /// Take an ack and window update from the peer
    pub fn receive(&mut self, msg: &TcpReceiverMessage) {
        if msg.rst {
            log::debug!("[tcp] <- RST, marking stream errored");
            self.input.set_error();
            return;
        }

        self.window_size = msg.window_size;

        let Some(ackno) = msg.ackno else {
            return;
        };
        let abs_ackno = ackno.unwrap(self.isn, self.abs_acked_num);
        if abs_ackno <= self.abs_acked_num || abs_ackno > self.abs_sender_num {
            log::trace!("[tcp] <- ack {} outside ({}, {}], ignored", abs_ackno, self.abs_acked_num, self.abs_sender_num);
            return;
        }
        self.abs_acked_num = abs_ackno;

        while let Some(front) = self.outstanding.front() {
            if front.end() > abs_ackno {
                break;
            }
            self.in_flight -= front.message.sequence_length();
            self.outstanding.pop_front();
        }

        self.timer.clear_retransmissions();
        self.timer.start(self.initial_rto_ms);
        if self.outstanding.is_empty() {
            self.timer.stop();
        }
    }

    /// Advance time; retransmit the oldest segment if the timer expires
    pub fn tick<F: FnMut(&TcpSenderMessage)>(&mut self, ms_since_last_tick: u64, mut transmit: F) {
        if self.input.has_error() {
            return;
        }
        let Some(oldest) = self.outstanding.front() else {
            return;
        };
        if !self.timer.elapse(ms_since_last_tick) {
            return;
        }

        log::debug!(
            "[tcp] timeout, retransmitting seq={} (rto={}ms, window={})",
            oldest.abs_seqno,
            self.timer.rto_ms(),
            self.window_size
        );
        transmit(&oldest.message);

        let rto = self.timer.rto_ms();
        if self.window_size > 0 {
            self.timer.record_retransmission();
            self.timer.start(rto * 2);
        } else {
            self.timer.start(rto);
        }
    }

    fn read_up_to(&mut self, limit: u64) -> Vec<u8> {
        let mut out = Vec::new();
        while self.input.bytes_buffered() > 0 && (out.len() as u64) < limit {
            let view = self.input.peek();
            assert!(
                !view.is_empty(),
                "reader reported {} buffered bytes but peek returned nothing",
                self.input.bytes_buffered()
            );
            let take = view.len().min((limit - out.len() as u64) as usize);
            out.extend_from_slice(&view[..take]);
            self.input.pop(take as u64);
        }
        out
    }
}
