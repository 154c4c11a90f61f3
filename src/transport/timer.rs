//! Retransmission timer
//!
//! A countdown driven by explicit `elapse` calls. It holds the current RTO,
//! whether it is running, and how many retransmissions happened back to back.
//! Back-off policy lives in the sender; this type only keeps time.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetransmitTimer {
    /// RTO the timer was last started with
    rto_ms: u64,
    remaining_ms: u64,
    running: bool,
    consecutive_retransmissions: u64,
}

impl RetransmitTimer {
    pub fn new(initial_rto_ms: u64) -> Self {
        Self {
            rto_ms: initial_rto_ms,
            remaining_ms: 0,
            running: false,
            consecutive_retransmissions: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn rto_ms(&self) -> u64 {
        self.rto_ms
    }

    /// (Re)start counting down from `rto_ms`
    pub fn start(&mut self, rto_ms: u64) {
        self.rto_ms = rto_ms;
        self.remaining_ms = rto_ms;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance by `ms`; returns `true` when a running timer reaches zero
    pub fn elapse(&mut self, ms: u64) -> bool {
        if !self.running {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(ms);
        self.remaining_ms == 0
    }

    pub fn consecutive_retransmissions(&self) -> u64 {
        self.consecutive_retransmissions
    }

    pub fn record_retransmission(&mut self) {
        self.consecutive_retransmissions += 1;
    }

    pub fn clear_retransmissions(&mut self) {
        self.consecutive_retransmissions = 0;
    }
}
