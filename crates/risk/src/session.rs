use std::collections::VecDeque;

use common::{TradeRecord, TradingMode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Trade history kept for `GET /status` as `trades[last 50]`.
const TRADE_HISTORY_CAP: usize = 50;

/// Configuration the session manager is built with.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Negative number: daily realized P&L at or below this activates the daily stop.
    pub daily_loss_limit: f64,
}

/// Tracks cumulative paper and live P&L, the paper→live gate, and the
/// daily-loss circuit breaker. Mutated only from the single dispatcher
/// that also owns the FSM.
#[derive(Debug)]
pub struct SessionManager {
    mode: TradingMode,
    paper_cumulative_pnl: f64,
    live_cumulative_pnl: f64,
    total_live_realised_pnl: f64,
    daily_realised_pnl: f64,
    daily_loss_limit: f64,
    daily_stop_active: bool,
    trades: VecDeque<TradeRecord>,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            mode: TradingMode::Paper,
            paper_cumulative_pnl: 0.0,
            live_cumulative_pnl: 0.0,
            total_live_realised_pnl: 0.0,
            daily_realised_pnl: 0.0,
            daily_loss_limit: config.daily_loss_limit,
            daily_stop_active: false,
            trades: VecDeque::with_capacity(TRADE_HISTORY_CAP),
        }
    }

    pub fn mode(&self) -> TradingMode {
        self.mode
    }

    pub fn daily_stop_active(&self) -> bool {
        self.daily_stop_active
    }

    /// Accepted only in PAPER mode. Accumulates paper P&L and checks the
    /// one-way gate to LIVE.
    pub fn update_paper_pnl(&mut self, delta: f64) {
        if self.mode != TradingMode::Paper {
            warn!(delta, mode = %self.mode, "updatePaperPnl ignored: not in PAPER mode");
            return;
        }
        self.paper_cumulative_pnl += delta;
        if self.paper_cumulative_pnl > 0.0 {
            info!(
                paper_cumulative_pnl = self.paper_cumulative_pnl,
                "Paper cumulative P&L turned positive — gating to LIVE"
            );
            self.mode = TradingMode::Live;
            self.live_cumulative_pnl = 0.0;
        }
    }

    /// Accepted only in LIVE mode. Accumulates live/daily P&L and checks
    /// the live-negative fallback and the daily-loss halt.
    pub fn update_live_pnl(&mut self, delta: f64) {
        if self.mode != TradingMode::Live {
            warn!(delta, mode = %self.mode, "updateLivePnl ignored: not in LIVE mode");
            return;
        }
        self.live_cumulative_pnl += delta;
        self.total_live_realised_pnl += delta;
        self.daily_realised_pnl += delta;

        if self.live_cumulative_pnl < 0.0 {
            warn!(
                live_cumulative_pnl = self.live_cumulative_pnl,
                "Live cumulative P&L turned negative — falling back to PAPER"
            );
            self.mode = TradingMode::Paper;
            self.daily_stop_active = true;
        }

        if self.daily_realised_pnl <= self.daily_loss_limit {
            warn!(
                daily_realised_pnl = self.daily_realised_pnl,
                limit = self.daily_loss_limit,
                "Daily loss limit reached — activating daily stop"
            );
            self.daily_stop_active = true;
        }
    }

    /// Routes a closed trade's realized P&L through the appropriate
    /// cumulative counter for the mode it was booked under, and appends it
    /// to the bounded trade history.
    pub fn record_trade(&mut self, trade: TradeRecord) {
        match trade.mode {
            TradingMode::Paper => self.update_paper_pnl(trade.realized_pnl),
            TradingMode::Live => self.update_live_pnl(trade.realized_pnl),
        }

        if self.trades.len() >= TRADE_HISTORY_CAP {
            self.trades.pop_front();
        }
        self.trades.push_back(trade);
    }

    /// Clears the daily counters. Called once per day by an external
    /// scheduler — out of scope here.
    pub fn reset_daily_stats(&mut self) {
        self.daily_realised_pnl = 0.0;
        self.daily_stop_active = false;
        info!("Daily session stats reset");
    }

    pub fn trade_history(&self) -> Vec<TradeRecord> {
        self.trades.iter().cloned().collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            paper_cumulative_pnl: self.paper_cumulative_pnl,
            live_cumulative_pnl: self.live_cumulative_pnl,
            total_live_realised_pnl: self.total_live_realised_pnl,
            daily_realised_pnl: self.daily_realised_pnl,
            daily_loss_limit: self.daily_loss_limit,
            daily_stop_active: self.daily_stop_active,
            trades: self.trade_history(),
        }
    }

    pub fn to_state(&self) -> SessionState {
        SessionState {
            mode: self.mode,
            paper_cumulative_pnl: self.paper_cumulative_pnl,
            live_cumulative_pnl: self.live_cumulative_pnl,
            total_live_realised_pnl: self.total_live_realised_pnl,
            daily_realised_pnl: self.daily_realised_pnl,
            daily_stop_active: self.daily_stop_active,
            trades: self.trade_history(),
        }
    }

    pub fn restore(config: SessionConfig, state: SessionState) -> Self {
        let mut trades = VecDeque::with_capacity(TRADE_HISTORY_CAP);
        trades.extend(state.trades);
        Self {
            mode: state.mode,
            paper_cumulative_pnl: state.paper_cumulative_pnl,
            live_cumulative_pnl: state.live_cumulative_pnl,
            total_live_realised_pnl: state.total_live_realised_pnl,
            daily_realised_pnl: state.daily_realised_pnl,
            daily_loss_limit: config.daily_loss_limit,
            daily_stop_active: state.daily_stop_active,
            trades,
        }
    }
}

/// Read-only view for `GET /status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub mode: TradingMode,
    pub paper_cumulative_pnl: f64,
    pub live_cumulative_pnl: f64,
    pub total_live_realised_pnl: f64,
    pub daily_realised_pnl: f64,
    pub daily_loss_limit: f64,
    pub daily_stop_active: bool,
    pub trades: Vec<TradeRecord>,
}

/// Persisted session state, forward-compatible for the snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default = "default_mode")]
    pub mode: TradingMode,
    #[serde(default)]
    pub paper_cumulative_pnl: f64,
    #[serde(default)]
    pub live_cumulative_pnl: f64,
    #[serde(default)]
    pub total_live_realised_pnl: f64,
    #[serde(default)]
    pub daily_realised_pnl: f64,
    #[serde(default)]
    pub daily_stop_active: bool,
    #[serde(default)]
    pub trades: Vec<TradeRecord>,
}

fn default_mode() -> TradingMode {
    TradingMode::Paper
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{OrderCause, PositionSide};

    fn manager(limit: f64) -> SessionManager {
        SessionManager::new(SessionConfig { daily_loss_limit: limit })
    }

    fn trade(mode: TradingMode, pnl: f64) -> TradeRecord {
        TradeRecord {
            side: PositionSide::Long,
            cause: OrderCause::TriggerHit,
            qty: 1.0,
            entry_price: 100.0,
            exit_price: 100.0 + pnl,
            realized_pnl: pnl,
            mode,
            closed_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn paper_to_live_gate_flips_on_positive_cumulative() {
        let mut m = manager(-500.0);
        m.update_paper_pnl(-0.5);
        assert_eq!(m.mode(), TradingMode::Paper);
        m.update_paper_pnl(0.7);
        assert_eq!(m.mode(), TradingMode::Live);
        assert_eq!(m.live_cumulative_pnl, 0.0);
    }

    #[test]
    fn live_to_paper_fallback_on_negative_cumulative() {
        let mut m = manager(-500.0);
        m.update_paper_pnl(1.0);
        assert_eq!(m.mode(), TradingMode::Live);
        m.update_live_pnl(1.0);
        m.update_live_pnl(-1.5);
        assert_eq!(m.mode(), TradingMode::Paper);
        assert!(m.daily_stop_active());
    }

    #[test]
    fn daily_loss_limit_activates_stop() {
        let mut m = manager(-10.0);
        m.update_paper_pnl(1.0);
        m.update_live_pnl(-11.0);
        assert!(m.daily_stop_active());
    }

    #[test]
    fn update_paper_pnl_ignored_in_live_mode() {
        let mut m = manager(-500.0);
        m.update_paper_pnl(1.0);
        assert_eq!(m.mode(), TradingMode::Live);
        m.update_paper_pnl(5.0);
        assert_eq!(m.paper_cumulative_pnl, 1.0);
    }

    #[test]
    fn trade_history_caps_at_fifty() {
        let mut m = manager(-500.0);
        m.update_paper_pnl(1.0); // enter LIVE
        for _ in 0..60 {
            m.record_trade(trade(TradingMode::Live, 0.1));
        }
        assert_eq!(m.trade_history().len(), TRADE_HISTORY_CAP);
    }

    #[test]
    fn reset_daily_stats_clears_stop_and_counter() {
        let mut m = manager(-10.0);
        m.update_paper_pnl(1.0);
        m.update_live_pnl(-11.0);
        assert!(m.daily_stop_active());
        m.reset_daily_stats();
        assert!(!m.daily_stop_active());
        assert_eq!(m.daily_realised_pnl, 0.0);
    }
}
