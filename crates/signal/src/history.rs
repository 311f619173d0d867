use std::collections::VecDeque;

use common::OrderSide;
use serde::{Deserialize, Serialize};

/// Bounded record of recently published signals, surfaced at `GET /status`
/// as `signalHistory (≤10)`.
const HISTORY_CAP: usize = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignalEvent {
    pub side: OrderSide,
    pub ts: i64,
}

#[derive(Debug, Default)]
pub struct SignalHistory {
    entries: VecDeque<SignalEvent>,
}

impl SignalHistory {
    pub fn new() -> Self {
        Self { entries: VecDeque::with_capacity(HISTORY_CAP) }
    }

    pub fn push(&mut self, side: OrderSide, ts: i64) {
        if self.entries.len() >= HISTORY_CAP {
            self.entries.pop_front();
        }
        self.entries.push_back(SignalEvent { side, ts });
    }

    pub fn snapshot(&self) -> Vec<SignalEvent> {
        self.entries.iter().copied().collect()
    }
}
