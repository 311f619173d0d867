use chrono::Utc;
use common::{OrderCause, PositionSide, TradeRecord, TradingMode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// P&L accounting for a single side of the instrument: long and short
/// exposure are tracked as two independent accounts rather than one
/// aggregated position, since the FSM already treats them independently.
#[derive(Debug, Clone, Default)]
pub struct PnlAccount {
    pub side: PositionSideSlot,
    pub position_qty: f64,
    pub avg_price: f64,
    pub last_price: f64,
    pub realized_pnl: f64,
    pub trades: Vec<TradeRecord>,
}

/// Marker for which side this account belongs to. Kept as a thin wrapper
/// (rather than bare `PositionSide`) so `PnlAccount::default()` can derive
/// without forcing a side — callers always construct via `PnlAccount::new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionSideSlot(pub PositionSide);

impl Default for PositionSideSlot {
    fn default() -> Self {
        PositionSideSlot(PositionSide::Long)
    }
}

impl PnlAccount {
    pub fn new(side: PositionSide) -> Self {
        Self {
            side: PositionSideSlot(side),
            ..Default::default()
        }
    }

    /// Open or add to this side's position. Weighted-average the entry
    /// price across the combined quantity.
    pub fn open(&mut self, qty: f64, price: f64) {
        let new_qty = self.position_qty + qty;
        if new_qty <= 0.0 {
            warn!(side = %self.side.0, "open() called with non-positive resulting quantity, ignoring");
            return;
        }
        self.avg_price = (self.avg_price * self.position_qty + price * qty) / new_qty;
        self.position_qty = new_qty;
        info!(side = %self.side.0, qty, price, "Position opened");
    }

    /// Close up to `qty` of this side's position at `price`, realizing
    /// P&L with the sign convention appropriate to the side. Returns the
    /// realized delta and the trade record appended to history.
    pub fn close(&mut self, qty: f64, price: f64, cause: OrderCause, mode: TradingMode) -> (f64, TradeRecord) {
        let clamped_qty = qty.min(self.position_qty).max(0.0);
        let entry_price = self.avg_price;

        let delta = match self.side.0 {
            PositionSide::Long => (price - entry_price) * clamped_qty,
            PositionSide::Short => (entry_price - price) * clamped_qty,
        };

        self.realized_pnl += delta;
        self.position_qty -= clamped_qty;
        if self.position_qty <= 0.0 {
            self.position_qty = 0.0;
            self.avg_price = 0.0;
        }

        let record = TradeRecord {
            side: self.side.0,
            cause,
            qty: clamped_qty,
            entry_price,
            exit_price: price,
            realized_pnl: delta,
            mode,
            closed_at: Utc::now(),
        };
        self.trades.push(record.clone());
        info!(side = %self.side.0, qty = clamped_qty, price, realized = delta, "Position closed");

        (delta, record)
    }

    pub fn update_mark_price(&mut self, price: f64) {
        self.last_price = price;
    }

    pub fn unrealized_pnl(&self) -> f64 {
        if self.position_qty <= 0.0 {
            return 0.0;
        }
        match self.side.0 {
            PositionSide::Long => (self.last_price - self.avg_price) * self.position_qty,
            PositionSide::Short => (self.avg_price - self.last_price) * self.position_qty,
        }
    }

    pub fn snapshot(&self, symbol: &str) -> PnlSnapshot {
        let unrealized = self.unrealized_pnl();
        let total = self.realized_pnl + unrealized;

        let wins: Vec<f64> = self.trades.iter().map(|t| t.realized_pnl).filter(|p| *p > 0.0).collect();
        let losses: Vec<f64> = self.trades.iter().map(|t| t.realized_pnl).filter(|p| *p < 0.0).collect();
        let total_wins: f64 = wins.iter().sum();
        let total_losses: f64 = losses.iter().map(|p| p.abs()).sum();
        let win_count = wins.len();
        let loss_count = losses.len();
        let trade_count = self.trades.len();

        let win_rate = if trade_count > 0 {
            win_count as f64 / trade_count as f64
        } else {
            0.0
        };
        let profit_factor = if total_losses > 0.0 { total_wins / total_losses } else { 0.0 };
        let best_trade = self.trades.iter().map(|t| t.realized_pnl).fold(f64::NEG_INFINITY, f64::max);
        let worst_trade = self.trades.iter().map(|t| t.realized_pnl).fold(f64::INFINITY, f64::min);
        let avg_trade_pnl = if trade_count > 0 {
            self.trades.iter().map(|t| t.realized_pnl).sum::<f64>() / trade_count as f64
        } else {
            0.0
        };
        const NOTIONAL_BASE: f64 = 1000.0;

        PnlSnapshot {
            symbol: symbol.to_string(),
            position_qty: round2(self.position_qty),
            position_side: self.side.0,
            avg_price: round2(self.avg_price),
            last_price: round2(self.last_price),
            realized_pnl: round2(self.realized_pnl),
            unrealized_pnl: round2(unrealized),
            total_pnl: round2(total),
            trade_count,
            trades: self.trades.clone(),
            metrics: PnlMetrics {
                win_rate: round2(win_rate),
                profit_factor: round2(profit_factor),
                best_trade: round2(if trade_count > 0 { best_trade } else { 0.0 }),
                worst_trade: round2(if trade_count > 0 { worst_trade } else { 0.0 }),
                avg_trade_pnl: round2(avg_trade_pnl),
                pnl_percentage: round2(total / NOTIONAL_BASE * 100.0),
                total_wins: round2(total_wins),
                total_losses: round2(total_losses),
                win_count,
                loss_count,
            },
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PnlMetrics {
    pub win_rate: f64,
    pub profit_factor: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
    pub avg_trade_pnl: f64,
    pub pnl_percentage: f64,
    pub total_wins: f64,
    pub total_losses: f64,
    pub win_count: usize,
    pub loss_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PnlSnapshot {
    pub symbol: String,
    pub position_qty: f64,
    pub position_side: PositionSide,
    pub avg_price: f64,
    pub last_price: f64,
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    pub total_pnl: f64,
    pub trade_count: usize,
    pub trades: Vec<TradeRecord>,
    pub metrics: PnlMetrics,
}

/// Serializable state of one side's account, for the snapshot file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PnlAccountState {
    #[serde(default)]
    pub position_qty: f64,
    #[serde(default)]
    pub avg_price: f64,
    #[serde(default)]
    pub last_price: f64,
    #[serde(default)]
    pub realized_pnl: f64,
    #[serde(default)]
    pub trades: Vec<TradeRecord>,
}

impl PnlAccount {
    pub fn to_state(&self) -> PnlAccountState {
        PnlAccountState {
            position_qty: self.position_qty,
            avg_price: self.avg_price,
            last_price: self.last_price,
            realized_pnl: self.realized_pnl,
            trades: self.trades.clone(),
        }
    }

    pub fn restore(side: PositionSide, state: PnlAccountState) -> Self {
        Self {
            side: PositionSideSlot(side),
            position_qty: state.position_qty,
            avg_price: state.avg_price,
            last_price: state.last_price,
            realized_pnl: state.realized_pnl,
            trades: state.trades,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_close_realizes_positive_pnl_on_price_rise() {
        let mut acct = PnlAccount::new(PositionSide::Long);
        acct.open(1.0, 100.0);
        let (delta, record) = acct.close(1.0, 101.5, OrderCause::TriggerHit, TradingMode::Paper);
        assert!((delta - 1.5).abs() < 1e-9);
        assert!((record.realized_pnl - 1.5).abs() < 1e-9);
        assert_eq!(acct.position_qty, 0.0);
        assert_eq!(acct.avg_price, 0.0);
    }

    #[test]
    fn short_close_realizes_positive_pnl_on_price_fall() {
        let mut acct = PnlAccount::new(PositionSide::Short);
        acct.open(1.0, 100.0);
        let (delta, _) = acct.close(1.0, 98.0, OrderCause::StopHit, TradingMode::Paper);
        assert!((delta - 2.0).abs() < 1e-9);
    }

    #[test]
    fn close_clamps_quantity_to_open_position() {
        let mut acct = PnlAccount::new(PositionSide::Long);
        acct.open(1.0, 100.0);
        let (delta, record) = acct.close(5.0, 110.0, OrderCause::ManualOverride, TradingMode::Paper);
        assert!((delta - 10.0).abs() < 1e-9);
        assert_eq!(record.qty, 1.0);
        assert_eq!(acct.position_qty, 0.0);
    }

    #[test]
    fn profit_factor_is_zero_with_no_losses() {
        let mut acct = PnlAccount::new(PositionSide::Long);
        acct.open(1.0, 100.0);
        acct.close(1.0, 105.0, OrderCause::TriggerHit, TradingMode::Paper);
        let snap = acct.snapshot("BTCUSDT");
        assert_eq!(snap.metrics.profit_factor, 0.0);
        assert_eq!(snap.metrics.total_losses, 0.0);
    }
}
