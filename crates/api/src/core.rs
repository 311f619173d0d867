use common::{OrderSide, TradeRecord, Tick, TradingMode};
use engine::{DualFsm, DualFsmState};
use paper::{DualPnl, DualPnlState, PaperBroker};
use risk::{SessionConfig, SessionManager, SessionState};
use serde::{Deserialize, Serialize};
use signal::{SignalEvent, SignalHistory};

/// The single mutex-guarded core: the FSM, the broker, the P&L books and
/// the session gate are all mutated together, from one logical execution
/// context, never independently.
pub struct Core {
    fsm: DualFsm,
    pnl: DualPnl,
    broker: PaperBroker,
    session: SessionManager,
    history: SignalHistory,
}

impl Core {
    pub fn new(daily_loss_limit: f64) -> Self {
        Self {
            fsm: DualFsm::new(),
            pnl: DualPnl::new(),
            broker: PaperBroker::new(),
            session: SessionManager::new(SessionConfig { daily_loss_limit }),
            history: SignalHistory::new(),
        }
    }

    pub fn mode(&self) -> TradingMode {
        self.session.mode()
    }

    /// Record an accepted webhook signal.
    pub fn handle_signal(&mut self, side: OrderSide, ts: i64) {
        self.fsm.on_signal(side);
        self.history.push(side, ts);
    }

    /// Dispatch one market tick to both sides and settle any resulting
    /// orders against the paper broker and the session gate.
    pub fn handle_tick(&mut self, tick: Tick) -> Vec<TradeRecord> {
        let outcome = self.fsm.on_tick(tick);
        self.pnl.update_mark_price(tick.price);
        self.settle(outcome.buy_order, outcome.sell_order)
    }

    /// Manual "close all".
    pub fn handle_override(&mut self) -> Vec<TradeRecord> {
        let outcome = self.fsm.manual_override();
        self.settle(outcome.buy_order, outcome.sell_order)
    }

    fn settle(
        &mut self,
        buy_order: Option<common::PlacedOrder>,
        sell_order: Option<common::PlacedOrder>,
    ) -> Vec<TradeRecord> {
        let mut trades = Vec::new();
        let mode = self.session.mode();

        if let Some(order) = buy_order {
            if let Some(trade) = self.broker.submit(order, mode, &mut self.pnl.long) {
                self.session.record_trade(trade.clone());
                trades.push(trade);
            }
        }
        if let Some(order) = sell_order {
            if let Some(trade) = self.broker.submit(order, mode, &mut self.pnl.short) {
                self.session.record_trade(trade.clone());
                trades.push(trade);
            }
        }
        trades
    }

    /// Fast-forward timer-only FSM transitions against the wall clock
    /// after a snapshot restore.
    pub fn catch_up(&mut self, now_ts: i64) {
        self.fsm.catch_up(now_ts);
    }

    pub fn status(&self, symbol: &str) -> StatusResponse {
        let fsm = self.fsm.snapshot();
        StatusResponse {
            buy_state: fsm.buy,
            sell_state: fsm.sell,
            pnl: self.pnl.snapshot(symbol),
            session: self.session.snapshot(),
            signal_history: self.history.snapshot(),
        }
    }

    pub fn to_state(&self) -> CoreState {
        CoreState {
            fsm: self.fsm.to_state(),
            pnl: self.pnl.to_state(),
            session: self.session.to_state(),
        }
    }

    pub fn restore(daily_loss_limit: f64, state: CoreState) -> Self {
        Self {
            fsm: DualFsm::restore(state.fsm),
            pnl: DualPnl::restore(state.pnl),
            broker: PaperBroker::new(),
            session: SessionManager::restore(SessionConfig { daily_loss_limit }, state.session),
            history: SignalHistory::new(),
        }
    }
}

/// Snapshot of the whole core, returned by `GET /status`.
/// Signal history is included for visibility but, unlike the other three
/// parts, is not persisted across restarts — it exists only to explain the
/// FSM's current state to an operator, not to drive behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub buy_state: engine::SideFsmSnapshot,
    pub sell_state: engine::SideFsmSnapshot,
    pub pnl: paper::DualPnlSnapshot,
    pub session: risk::SessionSnapshot,
    pub signal_history: Vec<SignalEvent>,
}

/// Persisted core state. Written and read as one
/// document: there's no meaningful partial-snapshot case, since all three
/// parts are mutated together under the same lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreState {
    pub fsm: DualFsmState,
    pub pnl: DualPnlState,
    pub session: SessionState,
}
