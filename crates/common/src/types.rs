use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single market trade event: price and the millisecond timestamp it
/// printed at. `ts` — never wall-clock — is the authoritative clock for
/// every FSM time comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub price: f64,
    pub ts: i64,
}

impl Tick {
    pub fn new(price: f64, ts: i64) -> Self {
        Self { price, ts }
    }
}

/// Which side of the instrument a position or signal concerns. `Buy`
/// drives the long-side FSM and opens `Long` positions; `Sell` drives
/// the short-side FSM and opens `Short` positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

impl OrderSide {
    pub fn position_side(self) -> PositionSide {
        match self {
            OrderSide::Buy => PositionSide::Long,
            OrderSide::Sell => PositionSide::Short,
        }
    }
}

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

impl std::fmt::Display for PositionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionSide::Long => write!(f, "long"),
            PositionSide::Short => write!(f, "short"),
        }
    }
}

/// An open simulated position on one side of the instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub side: PositionSide,
    pub qty: f64,
    pub entry_price: f64,
    pub stop: f64,
}

/// Why an order was placed, carried as a tag rather than a classifier
/// string: the broker switches on `intent` to decide open vs. close,
/// `cause` is carried only for logging and the trade record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderIntent {
    OpenLong,
    CloseLong,
    OpenShort,
    CloseShort,
}

impl OrderIntent {
    pub fn is_open(self) -> bool {
        matches!(self, OrderIntent::OpenLong | OrderIntent::OpenShort)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderCause {
    TriggerHit,
    StopHit,
    ManualOverride,
}

/// An order handed from the FSM to the paper broker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub intent: OrderIntent,
    pub cause: OrderCause,
    pub qty: f64,
    pub price: f64,
    pub ts: i64,
}

/// A closed trade, as recorded by a P&L account and echoed up to the
/// session manager's trade history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub side: PositionSide,
    pub cause: OrderCause,
    pub qty: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub realized_pnl: f64,
    pub mode: TradingMode,
    pub closed_at: DateTime<Utc>,
}

/// Whether a realized trade was booked against the paper or the live
/// cumulative P&L. Mode is monotone PAPER -> LIVE via the session gate,
/// with one engineered regression path back to PAPER.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    Paper,
    Live,
}

impl std::fmt::Display for TradingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradingMode::Paper => write!(f, "paper"),
            TradingMode::Live => write!(f, "live"),
        }
    }
}
