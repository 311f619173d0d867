use proptest::prelude::*;

use common::TradingMode;
use risk::{SessionConfig, SessionManager};

proptest! {
    /// PAPER -> LIVE only via updatePaperPnl making cumulative positive;
    /// LIVE -> PAPER only via updateLivePnl making cumulative negative.
    /// Feed a randomized sequence of deltas and assert the mode only ever
    /// changes immediately after the corresponding cumulative counter crosses
    /// its threshold, never spontaneously.
    #[test]
    fn mode_transitions_only_follow_the_documented_gates(
        deltas in prop::collection::vec(-5.0f64..5.0f64, 1..200),
    ) {
        let mut session = SessionManager::new(SessionConfig { daily_loss_limit: -1_000_000.0 });
        let mut paper_cum = 0.0f64;
        let mut live_cum = 0.0f64;

        for delta in deltas {
            let mode_before = session.mode();
            match mode_before {
                TradingMode::Paper => {
                    session.update_paper_pnl(delta);
                    paper_cum += delta;
                    if paper_cum > 0.0 {
                        prop_assert_eq!(session.mode(), TradingMode::Live);
                        live_cum = 0.0;
                    } else {
                        prop_assert_eq!(session.mode(), TradingMode::Paper);
                    }
                }
                TradingMode::Live => {
                    session.update_live_pnl(delta);
                    live_cum += delta;
                    if live_cum < 0.0 {
                        prop_assert_eq!(session.mode(), TradingMode::Paper);
                    } else {
                        prop_assert_eq!(session.mode(), TradingMode::Live);
                    }
                }
            }
        }
    }

    /// Never panics regardless of delta magnitude, including extremes.
    #[test]
    fn session_updates_never_panic_on_extreme_deltas(
        delta in -1_000_000.0f64..1_000_000.0f64,
    ) {
        let mut session = SessionManager::new(SessionConfig { daily_loss_limit: -500.0 });
        session.update_paper_pnl(delta);
        session.update_live_pnl(delta);
    }
}
