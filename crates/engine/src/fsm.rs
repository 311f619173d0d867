use common::{OrderCause, OrderIntent, OrderSide, PlacedOrder, Position, Tick};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Fixed offset, in instrument price units, between the anchor (latched
/// last-traded-price) and its derived trigger/stop.
const ANCHOR_OFFSET: f64 = 0.5;
/// Entry/profit/wait-for-entry window budget.
const WINDOW_MS: i64 = 60_000;
/// Every position this engine opens is a fixed single unit.
const ORDER_QTY: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FsmPhase {
    WaitForSignal,
    Signal,
    EntryWindow,
    ProfitWindow,
    WaitWindow,
    WaitForEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaitWindowCaller {
    Entry,
    Profit,
}

/// One side's state machine (long-side reacting to BUY, or short-side
/// reacting to SELL). The BUY/long phase transitions are mirrored
/// for SELL/short by flipping the comparison directions; that mirroring
/// lives entirely in `anchor_offsets`/`favorable`/`adverse` below so the
/// phase-transition logic itself is written once.
#[derive(Debug, Clone)]
pub struct SideFsm {
    side: OrderSide,
    phase: FsmPhase,
    saved_ltp: Option<f64>,
    entry_trigger: Option<f64>,
    stop_anchor: Option<f64>,
    entry_window_start_ts: Option<i64>,
    profit_window_start_ts: Option<i64>,
    wait_window_start_ts: Option<i64>,
    wait_window_duration_ms: Option<i64>,
    wait_window_caller: Option<WaitWindowCaller>,
    wait_for_entry_start_ts: Option<i64>,
    /// Exactly-one-evaluation gate shared by SIGNAL, ENTRY_WINDOW and
    /// WAIT_FOR_ENTRY — only one of those phases is ever active at a
    /// time, so a single flag serves all three.
    pending_tick_decision: bool,
    position: Option<Position>,
}

impl SideFsm {
    pub fn new(side: OrderSide) -> Self {
        Self {
            side,
            phase: FsmPhase::WaitForSignal,
            saved_ltp: None,
            entry_trigger: None,
            stop_anchor: None,
            entry_window_start_ts: None,
            profit_window_start_ts: None,
            wait_window_start_ts: None,
            wait_window_duration_ms: None,
            wait_window_caller: None,
            wait_for_entry_start_ts: None,
            pending_tick_decision: false,
            position: None,
        }
    }

    pub fn phase(&self) -> FsmPhase {
        self.phase
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    /// Accept a signal on this side. Always resets
    /// phase/anchors to SIGNAL, discarding any prior mid-cycle state —
    /// except the open position itself, which is untouched by a signal
    /// and is only ever closed by a stop-out or manual override.
    pub fn on_signal(&mut self) {
        info!(side = %self.side, "Signal accepted, resetting to SIGNAL");
        self.phase = FsmPhase::Signal;
        self.saved_ltp = None;
        self.entry_trigger = None;
        self.stop_anchor = None;
        self.entry_window_start_ts = None;
        self.profit_window_start_ts = None;
        self.wait_window_start_ts = None;
        self.wait_window_duration_ms = None;
        self.wait_window_caller = None;
        self.wait_for_entry_start_ts = None;
        self.pending_tick_decision = true;
    }

    /// Process one tick. Returns an order if this tick caused an open or close.
    pub fn on_tick(&mut self, tick: Tick) -> Option<PlacedOrder> {
        match self.phase {
            FsmPhase::WaitForSignal => None,
            FsmPhase::Signal => self.tick_signal(tick),
            FsmPhase::EntryWindow => self.tick_entry_window(tick),
            FsmPhase::ProfitWindow => self.tick_profit_window(tick),
            FsmPhase::WaitWindow => self.tick_wait_window(tick),
            FsmPhase::WaitForEntry => self.tick_wait_for_entry(tick),
        }
    }

    fn tick_signal(&mut self, tick: Tick) -> Option<PlacedOrder> {
        if !self.pending_tick_decision {
            return None;
        }
        self.pending_tick_decision = false;

        let ltp = tick.price;
        self.saved_ltp = Some(ltp);
        self.entry_trigger = Some(self.trigger_from_ltp(ltp));
        self.stop_anchor = Some(self.stop_from_ltp(ltp));
        self.entry_window_start_ts = Some(tick.ts);
        self.phase = FsmPhase::EntryWindow;
        self.pending_tick_decision = true;
        None
    }

    fn tick_entry_window(&mut self, tick: Tick) -> Option<PlacedOrder> {
        if !self.pending_tick_decision {
            return None;
        }
        self.pending_tick_decision = false;

        let trigger = self.entry_trigger.expect("entry trigger set on entering ENTRY_WINDOW");
        if self.favorable(tick.price, trigger) {
            self.open_position(tick, OrderCause::TriggerHit)
        } else {
            let start = self.entry_window_start_ts.expect("start set on entering ENTRY_WINDOW");
            let residual = (WINDOW_MS - (tick.ts - start)).max(0);
            self.enter_wait_window(tick.ts, residual, WaitWindowCaller::Entry);
            None
        }
    }

    fn tick_profit_window(&mut self, tick: Tick) -> Option<PlacedOrder> {
        let stop = self.position.as_ref().expect("PROFIT_WINDOW requires an open position").stop;

        if self.adverse(tick.price, stop) {
            let order = self.close_position(tick, OrderCause::StopHit);
            let start = self.profit_window_start_ts.expect("start set on entering PROFIT_WINDOW");
            let residual = (WINDOW_MS - (tick.ts - start)).max(0);
            self.enter_wait_window(tick.ts, residual, WaitWindowCaller::Profit);
            Some(order)
        } else {
            let start = self.profit_window_start_ts.expect("start set on entering PROFIT_WINDOW");
            if tick.ts - start >= WINDOW_MS {
                self.profit_window_start_ts = Some(tick.ts);
            }
            None
        }
    }

    fn tick_wait_window(&mut self, tick: Tick) -> Option<PlacedOrder> {
        let start = self.wait_window_start_ts.expect("start set on entering WAIT_WINDOW");
        let duration = self.wait_window_duration_ms.expect("duration set on entering WAIT_WINDOW");

        if tick.ts - start >= duration {
            match self.wait_window_caller.expect("caller set on entering WAIT_WINDOW") {
                WaitWindowCaller::Entry => {
                    // Resuming ENTRY_WINDOW starts a fresh 60s budget from
                    // this tick: the prior window's budget was already
                    // consumed across ENTRY_WINDOW + WAIT_WINDOW.
                    self.entry_window_start_ts = Some(tick.ts);
                    self.phase = FsmPhase::EntryWindow;
                    self.pending_tick_decision = true;
                }
                WaitWindowCaller::Profit => {
                    self.wait_for_entry_start_ts = Some(tick.ts);
                    self.phase = FsmPhase::WaitForEntry;
                    self.pending_tick_decision = true;
                }
            }
        }
        None
    }

    fn tick_wait_for_entry(&mut self, tick: Tick) -> Option<PlacedOrder> {
        if self.pending_tick_decision {
            self.pending_tick_decision = false;
            let trigger = self.entry_trigger.expect("entry trigger retained across WAIT_FOR_ENTRY");
            if self.favorable(tick.price, trigger) {
                return self.open_position(tick, OrderCause::TriggerHit);
            }
            return None;
        }

        let start = self.wait_for_entry_start_ts.expect("start set on entering WAIT_FOR_ENTRY");
        if tick.ts - start >= WINDOW_MS {
            self.wait_for_entry_start_ts = Some(tick.ts);
            self.pending_tick_decision = true;
        }
        None
    }

    /// Manual "close all". No-op if no position is open on this side;
    /// always returns the side to WAIT_FOR_SIGNAL with timers cleared.
    pub fn manual_close(&mut self, last_price: f64, ts: i64) -> Option<PlacedOrder> {
        let order = if self.position.is_some() {
            let tick = Tick::new(last_price, ts);
            Some(self.close_position(tick, OrderCause::ManualOverride))
        } else {
            None
        };

        self.phase = FsmPhase::WaitForSignal;
        self.saved_ltp = None;
        self.entry_trigger = None;
        self.stop_anchor = None;
        self.entry_window_start_ts = None;
        self.profit_window_start_ts = None;
        self.wait_window_start_ts = None;
        self.wait_window_duration_ms = None;
        self.wait_window_caller = None;
        self.wait_for_entry_start_ts = None;
        self.pending_tick_decision = false;
        order
    }

    /// Fast-forward timer-only transitions against the current clock after
    /// a snapshot restore ("snapshot restoration of in-flight timers").
    /// Only transitions that don't require an actual tick price are
    /// resolved here; ENTRY_WINDOW/WAIT_FOR_ENTRY trigger decisions always
    /// wait for a genuine next tick.
    pub fn catch_up(&mut self, now_ts: i64) {
        match self.phase {
            FsmPhase::ProfitWindow => {
                if let Some(start) = self.profit_window_start_ts {
                    if now_ts - start >= WINDOW_MS {
                        self.profit_window_start_ts = Some(now_ts);
                    }
                }
            }
            FsmPhase::WaitWindow => {
                if let (Some(start), Some(duration), Some(caller)) =
                    (self.wait_window_start_ts, self.wait_window_duration_ms, self.wait_window_caller)
                {
                    if now_ts - start >= duration {
                        match caller {
                            WaitWindowCaller::Entry => {
                                self.entry_window_start_ts = Some(now_ts);
                                self.phase = FsmPhase::EntryWindow;
                                self.pending_tick_decision = true;
                            }
                            WaitWindowCaller::Profit => {
                                self.wait_for_entry_start_ts = Some(now_ts);
                                self.phase = FsmPhase::WaitForEntry;
                                self.pending_tick_decision = true;
                            }
                        }
                    }
                }
            }
            FsmPhase::WaitForEntry => {
                if !self.pending_tick_decision {
                    if let Some(start) = self.wait_for_entry_start_ts {
                        if now_ts - start >= WINDOW_MS {
                            self.wait_for_entry_start_ts = Some(now_ts);
                            self.pending_tick_decision = true;
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn enter_wait_window(&mut self, ts: i64, duration_ms: i64, caller: WaitWindowCaller) {
        if duration_ms <= 0 {
            warn!(side = %self.side, "WAIT_WINDOW residual is zero, resolving immediately");
            self.wait_window_start_ts = Some(ts);
            self.wait_window_duration_ms = Some(0);
            self.wait_window_caller = Some(caller);
            self.phase = FsmPhase::WaitWindow;
            // Resolve immediately using this same tick's timestamp.
            self.tick_wait_window(Tick::new(0.0, ts));
            return;
        }
        self.phase = FsmPhase::WaitWindow;
        self.wait_window_start_ts = Some(ts);
        self.wait_window_duration_ms = Some(duration_ms);
        self.wait_window_caller = Some(caller);
    }

    /// Opens a position on this side, unless one is already held — a signal
    /// can re-arm SIGNAL/ENTRY_WINDOW while an older position from this same
    /// side is still open (`on_signal` deliberately leaves `self.position`
    /// untouched), and that re-armed window must not overwrite it. Guard:
    /// drop the call and log a warn, do not transition.
    fn open_position(&mut self, tick: Tick, cause: OrderCause) -> Option<PlacedOrder> {
        if self.position.is_some() {
            warn!(side = %self.side, "Entry trigger hit while a position is already open on this side, dropping open");
            return None;
        }

        let stop = self.stop_anchor.expect("stop anchor set before an open decision");
        self.position = Some(Position {
            side: self.side.position_side(),
            qty: ORDER_QTY,
            entry_price: tick.price,
            stop,
        });
        self.profit_window_start_ts = Some(tick.ts);
        self.phase = FsmPhase::ProfitWindow;
        info!(side = %self.side, price = tick.price, "Position opened");

        Some(PlacedOrder {
            intent: self.open_intent(),
            cause,
            qty: ORDER_QTY,
            price: tick.price,
            ts: tick.ts,
        })
    }

    fn close_position(&mut self, tick: Tick, cause: OrderCause) -> PlacedOrder {
        let position = self.position.take().expect("close_position requires an open position");
        info!(side = %self.side, price = tick.price, cause = ?cause, "Position closed");

        PlacedOrder {
            intent: self.close_intent(),
            cause,
            qty: position.qty,
            price: tick.price,
            ts: tick.ts,
        }
    }

    fn open_intent(&self) -> OrderIntent {
        match self.side {
            OrderSide::Buy => OrderIntent::OpenLong,
            OrderSide::Sell => OrderIntent::OpenShort,
        }
    }

    fn close_intent(&self) -> OrderIntent {
        match self.side {
            OrderSide::Buy => OrderIntent::CloseLong,
            OrderSide::Sell => OrderIntent::CloseShort,
        }
    }

    fn trigger_from_ltp(&self, ltp: f64) -> f64 {
        match self.side {
            OrderSide::Buy => ltp + ANCHOR_OFFSET,
            OrderSide::Sell => ltp - ANCHOR_OFFSET,
        }
    }

    fn stop_from_ltp(&self, ltp: f64) -> f64 {
        match self.side {
            OrderSide::Buy => ltp - ANCHOR_OFFSET,
            OrderSide::Sell => ltp + ANCHOR_OFFSET,
        }
    }

    /// True if `price` has crossed the entry trigger in the direction that
    /// opens this side's position (long: upward, short: downward).
    fn favorable(&self, price: f64, trigger: f64) -> bool {
        match self.side {
            OrderSide::Buy => price >= trigger,
            OrderSide::Sell => price <= trigger,
        }
    }

    /// True if `price` has crossed the stop in the direction that closes
    /// this side's position (long: downward, short: upward).
    fn adverse(&self, price: f64, stop: f64) -> bool {
        match self.side {
            OrderSide::Buy => price <= stop,
            OrderSide::Sell => price >= stop,
        }
    }

    pub fn snapshot(&self) -> SideFsmSnapshot {
        SideFsmSnapshot {
            phase: self.phase,
            saved_ltp: self.saved_ltp,
            entry_trigger: self.entry_trigger,
            stop_anchor: self.stop_anchor,
            position: self.position.clone(),
            entry_window_start_ts: self.entry_window_start_ts,
            profit_window_start_ts: self.profit_window_start_ts,
            wait_window_start_ts: self.wait_window_start_ts,
            wait_window_duration_ms: self.wait_window_duration_ms,
            wait_window_caller: self.wait_window_caller,
            wait_for_entry_start_ts: self.wait_for_entry_start_ts,
        }
    }

    pub fn to_state(&self) -> SideFsmState {
        SideFsmState {
            phase: self.phase,
            saved_ltp: self.saved_ltp,
            entry_trigger: self.entry_trigger,
            stop_anchor: self.stop_anchor,
            position: self.position.clone(),
            entry_window_start_ts: self.entry_window_start_ts,
            profit_window_start_ts: self.profit_window_start_ts,
            wait_window_start_ts: self.wait_window_start_ts,
            wait_window_duration_ms: self.wait_window_duration_ms,
            wait_window_caller: self.wait_window_caller,
            wait_for_entry_start_ts: self.wait_for_entry_start_ts,
            pending_tick_decision: self.pending_tick_decision,
        }
    }

    pub fn restore(side: OrderSide, state: SideFsmState) -> Self {
        Self {
            side,
            phase: state.phase,
            saved_ltp: state.saved_ltp,
            entry_trigger: state.entry_trigger,
            stop_anchor: state.stop_anchor,
            entry_window_start_ts: state.entry_window_start_ts,
            profit_window_start_ts: state.profit_window_start_ts,
            wait_window_start_ts: state.wait_window_start_ts,
            wait_window_duration_ms: state.wait_window_duration_ms,
            wait_window_caller: state.wait_window_caller,
            wait_for_entry_start_ts: state.wait_for_entry_start_ts,
            pending_tick_decision: state.pending_tick_decision,
            position: state.position,
        }
    }
}

/// Read-only view for `GET /status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideFsmSnapshot {
    pub phase: FsmPhase,
    pub saved_ltp: Option<f64>,
    pub entry_trigger: Option<f64>,
    pub stop_anchor: Option<f64>,
    pub position: Option<Position>,
    pub entry_window_start_ts: Option<i64>,
    pub profit_window_start_ts: Option<i64>,
    pub wait_window_start_ts: Option<i64>,
    pub wait_window_duration_ms: Option<i64>,
    pub wait_window_caller: Option<WaitWindowCaller>,
    pub wait_for_entry_start_ts: Option<i64>,
}

/// Persisted form of a side's FSM, forward-compatible for the snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideFsmState {
    #[serde(default = "default_phase")]
    pub phase: FsmPhase,
    #[serde(default)]
    pub saved_ltp: Option<f64>,
    #[serde(default)]
    pub entry_trigger: Option<f64>,
    #[serde(default)]
    pub stop_anchor: Option<f64>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub entry_window_start_ts: Option<i64>,
    #[serde(default)]
    pub profit_window_start_ts: Option<i64>,
    #[serde(default)]
    pub wait_window_start_ts: Option<i64>,
    #[serde(default)]
    pub wait_window_duration_ms: Option<i64>,
    #[serde(default)]
    pub wait_window_caller: Option<WaitWindowCaller>,
    #[serde(default)]
    pub wait_for_entry_start_ts: Option<i64>,
    #[serde(default)]
    pub pending_tick_decision: bool,
}

fn default_phase() -> FsmPhase {
    FsmPhase::WaitForSignal
}

impl Default for SideFsmState {
    fn default() -> Self {
        Self {
            phase: FsmPhase::WaitForSignal,
            saved_ltp: None,
            entry_trigger: None,
            stop_anchor: None,
            position: None,
            entry_window_start_ts: None,
            profit_window_start_ts: None,
            wait_window_start_ts: None,
            wait_window_duration_ms: None,
            wait_window_caller: None,
            wait_for_entry_start_ts: None,
            pending_tick_decision: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// S1: long entry & take, stop-out.
    #[test]
    fn scenario_s1_long_entry_then_stop_out() {
        let mut fsm = SideFsm::new(OrderSide::Buy);
        fsm.on_signal();

        assert!(fsm.on_tick(Tick::new(100.0, 1000)).is_none());
        assert_eq!(fsm.entry_trigger, Some(100.5));
        assert_eq!(fsm.stop_anchor, Some(99.5));

        let order = fsm.on_tick(Tick::new(100.6, 2000)).expect("entry trigger hit");
        assert_eq!(order.intent, OrderIntent::OpenLong);
        assert_eq!(fsm.phase(), FsmPhase::ProfitWindow);

        let order = fsm.on_tick(Tick::new(99.4, 3000)).expect("stop hit");
        assert_eq!(order.intent, OrderIntent::CloseLong);
        assert_eq!(order.cause, OrderCause::StopHit);
        assert_eq!(fsm.phase(), FsmPhase::WaitWindow);
        assert_eq!(fsm.wait_window_duration_ms, Some(59_000));
        assert_eq!(fsm.wait_window_caller, Some(WaitWindowCaller::Profit));
    }

    /// S2: entry miss then retry against the same anchors.
    #[test]
    fn scenario_s2_entry_miss_then_retry() {
        let mut fsm = SideFsm::new(OrderSide::Buy);
        fsm.on_signal();
        fsm.on_tick(Tick::new(200.0, 0));
        assert_eq!(fsm.entry_window_start_ts, Some(0));

        assert!(fsm.on_tick(Tick::new(199.8, 1000)).is_none());
        assert_eq!(fsm.phase(), FsmPhase::WaitWindow);
        assert_eq!(fsm.wait_window_duration_ms, Some(59_000));

        // before residual elapses: no-op
        assert!(fsm.on_tick(Tick::new(199.8, 1500)).is_none());
        assert_eq!(fsm.phase(), FsmPhase::WaitWindow);

        // residual elapses at 1000 + 59000 = 60000
        assert!(fsm.on_tick(Tick::new(199.8, 60_000)).is_none());
        assert_eq!(fsm.phase(), FsmPhase::EntryWindow);

        let order = fsm.on_tick(Tick::new(200.6, 61_000)).expect("trigger hit on retry");
        assert_eq!(order.price, 200.6);
        assert_eq!(fsm.phase(), FsmPhase::ProfitWindow);
    }

    /// S3: wait-for-entry re-arm loop.
    #[test]
    fn scenario_s3_wait_for_entry_rearm() {
        let mut fsm = SideFsm::new(OrderSide::Buy);
        fsm.on_signal();
        fsm.on_tick(Tick::new(100.0, 0));
        fsm.on_tick(Tick::new(100.6, 1000)); // opens LONG
        fsm.on_tick(Tick::new(99.4, 2000)); // stop-out -> WAIT_WINDOW, duration=59000, caller=Profit
        fsm.on_tick(Tick::new(99.4, 61_000)); // wait window resolves -> WAIT_FOR_ENTRY
        assert_eq!(fsm.phase(), FsmPhase::WaitForEntry);

        // first tick doesn't trigger
        assert!(fsm.on_tick(Tick::new(99.4, 61_500)).is_none());
        assert_eq!(fsm.phase(), FsmPhase::WaitForEntry);

        // further ticks before the 60s restart do not re-evaluate
        assert!(fsm.on_tick(Tick::new(100.7, 90_000)).is_none());
        assert_eq!(fsm.phase(), FsmPhase::WaitForEntry);

        // restart at start+60000 = 121_500; next tick is decisive
        assert!(fsm.on_tick(Tick::new(99.0, 121_500)).is_none());
        let order = fsm.on_tick(Tick::new(100.7, 122_000)).expect("trigger hit");
        assert_eq!(order.intent, OrderIntent::OpenLong);
        assert_eq!(fsm.phase(), FsmPhase::ProfitWindow);
    }

    #[test]
    fn manual_override_closes_and_resets() {
        let mut fsm = SideFsm::new(OrderSide::Buy);
        fsm.on_signal();
        fsm.on_tick(Tick::new(100.0, 0));
        fsm.on_tick(Tick::new(100.6, 1000));
        assert!(fsm.position().is_some());

        let order = fsm.manual_close(101.0, 2000).expect("position was open");
        assert_eq!(order.cause, OrderCause::ManualOverride);
        assert_eq!(fsm.phase(), FsmPhase::WaitForSignal);
        assert!(fsm.position().is_none());
    }

    #[test]
    fn manual_override_is_silent_without_a_position() {
        let mut fsm = SideFsm::new(OrderSide::Buy);
        assert!(fsm.manual_close(100.0, 0).is_none());
        assert_eq!(fsm.phase(), FsmPhase::WaitForSignal);
    }

    #[test]
    fn zero_residual_resolves_wait_window_immediately() {
        let mut fsm = SideFsm::new(OrderSide::Buy);
        fsm.on_signal();
        fsm.on_tick(Tick::new(200.0, 0));
        // entry window consumed the full 60000ms budget already
        assert!(fsm.on_tick(Tick::new(199.0, 60_000)).is_none());
        assert_eq!(fsm.phase(), FsmPhase::EntryWindow);
    }

    #[test]
    fn reopen_while_position_already_held_is_dropped() {
        let mut fsm = SideFsm::new(OrderSide::Buy);
        fsm.on_signal();
        fsm.on_tick(Tick::new(100.0, 0));
        fsm.on_tick(Tick::new(100.6, 1000)); // opens LONG at 100.6
        let original = fsm.position().expect("position open").clone();

        // A fresh signal re-arms SIGNAL/ENTRY_WINDOW while the old position
        // is still held (on_signal never touches self.position).
        fsm.on_signal();
        fsm.on_tick(Tick::new(200.0, 2000));
        let order = fsm.on_tick(Tick::new(200.6, 3000)); // would trigger a second open

        assert!(order.is_none(), "duplicate open must be dropped");
        assert_eq!(fsm.position(), Some(&original), "original position must be untouched");
    }

    #[test]
    fn short_side_mirrors_comparisons() {
        let mut fsm = SideFsm::new(OrderSide::Sell);
        fsm.on_signal();
        fsm.on_tick(Tick::new(100.0, 0));
        assert_eq!(fsm.entry_trigger, Some(99.5));
        assert_eq!(fsm.stop_anchor, Some(100.5));

        let order = fsm.on_tick(Tick::new(99.4, 1000)).expect("short trigger hit on fall");
        assert_eq!(order.intent, OrderIntent::OpenShort);

        let order = fsm.on_tick(Tick::new(100.6, 2000)).expect("short stop hit on rise");
        assert_eq!(order.intent, OrderIntent::CloseShort);
    }
}
