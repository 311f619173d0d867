pub mod broker;
pub mod pnl;

pub use broker::PaperBroker;
pub use pnl::{PnlAccount, PnlAccountState, PnlMetrics, PnlSnapshot};

use common::PositionSide;
use serde::{Deserialize, Serialize};

/// The long and short books, tracked independently: the two FSMs never
/// share a position, so neither should their P&L.
#[derive(Debug)]
pub struct DualPnl {
    pub long: PnlAccount,
    pub short: PnlAccount,
}

impl Default for DualPnl {
    fn default() -> Self {
        Self {
            long: PnlAccount::new(PositionSide::Long),
            short: PnlAccount::new(PositionSide::Short),
        }
    }
}

impl DualPnl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both books mark against the same instrument, so a tick updates both.
    pub fn update_mark_price(&mut self, price: f64) {
        self.long.update_mark_price(price);
        self.short.update_mark_price(price);
    }

    pub fn snapshot(&self, symbol: &str) -> DualPnlSnapshot {
        DualPnlSnapshot {
            long: self.long.snapshot(symbol),
            short: self.short.snapshot(symbol),
            combined_realized_pnl: round2(self.long.realized_pnl + self.short.realized_pnl),
            combined_unrealized_pnl: round2(self.long.unrealized_pnl() + self.short.unrealized_pnl()),
        }
    }

    pub fn to_state(&self) -> DualPnlState {
        DualPnlState {
            long: self.long.to_state(),
            short: self.short.to_state(),
        }
    }

    pub fn restore(state: DualPnlState) -> Self {
        Self {
            long: PnlAccount::restore(PositionSide::Long, state.long),
            short: PnlAccount::restore(PositionSide::Short, state.short),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DualPnlSnapshot {
    pub long: PnlSnapshot,
    pub short: PnlSnapshot,
    pub combined_realized_pnl: f64,
    pub combined_unrealized_pnl: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DualPnlState {
    #[serde(default)]
    pub long: PnlAccountState,
    #[serde(default)]
    pub short: PnlAccountState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dual_pnl_books_are_independent() {
        let mut dual = DualPnl::new();
        dual.long.open(1.0, 100.0);
        dual.update_mark_price(110.0);

        assert!((dual.long.unrealized_pnl() - 10.0).abs() < 1e-9);
        assert_eq!(dual.short.unrealized_pnl(), 0.0);
    }
}
