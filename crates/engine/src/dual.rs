use common::{OrderSide, PlacedOrder, Tick};
use serde::{Deserialize, Serialize};

use crate::fsm::{SideFsm, SideFsmSnapshot, SideFsmState};

/// Orders produced by dispatching one tick to both sides, in the stable
/// BUY-then-SELL order the ordering guarantees require.
#[derive(Debug, Clone, Copy, Default)]
pub struct DualTickOutcome {
    pub buy_order: Option<PlacedOrder>,
    pub sell_order: Option<PlacedOrder>,
}

/// The long-side and short-side state machines — no coupling between the
/// BUY and SELL FSMs. A tick is delivered to both, in the same stable
/// order, before the next tick is accepted.
#[derive(Debug)]
pub struct DualFsm {
    pub buy: SideFsm,
    pub sell: SideFsm,
    last_tick: Option<Tick>,
}

impl Default for DualFsm {
    fn default() -> Self {
        Self {
            buy: SideFsm::new(OrderSide::Buy),
            sell: SideFsm::new(OrderSide::Sell),
            last_tick: None,
        }
    }
}

impl DualFsm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_signal(&mut self, side: OrderSide) {
        match side {
            OrderSide::Buy => self.buy.on_signal(),
            OrderSide::Sell => self.sell.on_signal(),
        }
    }

    /// Dispatch one tick to both sides, BUY first then SELL.
    pub fn on_tick(&mut self, tick: Tick) -> DualTickOutcome {
        let buy_order = self.buy.on_tick(tick);
        let sell_order = self.sell.on_tick(tick);
        self.last_tick = Some(tick);
        DualTickOutcome { buy_order, sell_order }
    }

    /// Manual "close all". Fails silently on a side if no tick has
    /// been observed yet for the instrument as a whole.
    pub fn manual_override(&mut self) -> DualTickOutcome {
        let Some(tick) = self.last_tick else {
            return DualTickOutcome::default();
        };
        DualTickOutcome {
            buy_order: self.buy.manual_close(tick.price, tick.ts),
            sell_order: self.sell.manual_close(tick.price, tick.ts),
        }
    }

    pub fn catch_up(&mut self, now_ts: i64) {
        self.buy.catch_up(now_ts);
        self.sell.catch_up(now_ts);
    }

    pub fn last_tick(&self) -> Option<Tick> {
        self.last_tick
    }

    pub fn snapshot(&self) -> DualFsmSnapshot {
        DualFsmSnapshot {
            buy: self.buy.snapshot(),
            sell: self.sell.snapshot(),
            last_tick: self.last_tick,
        }
    }

    pub fn to_state(&self) -> DualFsmState {
        DualFsmState {
            buy: self.buy.to_state(),
            sell: self.sell.to_state(),
            last_tick: self.last_tick,
        }
    }

    pub fn restore(state: DualFsmState) -> Self {
        Self {
            buy: SideFsm::restore(OrderSide::Buy, state.buy),
            sell: SideFsm::restore(OrderSide::Sell, state.sell),
            last_tick: state.last_tick,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DualFsmSnapshot {
    pub buy: SideFsmSnapshot,
    pub sell: SideFsmSnapshot,
    pub last_tick: Option<Tick>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DualFsmState {
    #[serde(default)]
    pub buy: SideFsmState,
    #[serde(default)]
    pub sell: SideFsmState,
    #[serde(default)]
    pub last_tick: Option<Tick>,
}
