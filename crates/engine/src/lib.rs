pub mod dual;
pub mod fsm;
pub mod market;

pub use dual::{DualFsm, DualFsmSnapshot, DualFsmState, DualTickOutcome};
pub use fsm::{FsmPhase, SideFsm, SideFsmSnapshot, SideFsmState};
pub use market::MarketDataStream;
