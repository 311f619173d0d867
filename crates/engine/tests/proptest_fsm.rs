use common::{OrderSide, Tick};
use engine::{FsmPhase, SideFsm};
use proptest::prelude::*;

/// Drives one side's FSM through a random tick sequence and checks the
/// invariants that hold across every phase, not just the scripted
/// scenarios: the 1.0 trigger/stop spacing, and "an open position implies
/// PROFIT_WINDOW, and nothing else does".
fn run_sequence(side: OrderSide, deltas: Vec<(f64, i64)>) {
    let mut fsm = SideFsm::new(side);
    fsm.on_signal();
    let mut ts = 0i64;

    for (price, delta) in deltas {
        ts += delta.max(1);
        fsm.on_tick(Tick::new(price, ts));

        let snap = fsm.snapshot();
        if let (Some(trigger), Some(stop)) = (snap.entry_trigger, snap.stop_anchor) {
            let spacing = (trigger - stop).abs();
            assert!(
                (spacing - 1.0).abs() < 1e-9,
                "trigger/stop spacing drifted: trigger={trigger} stop={stop}"
            );
        }

        assert_eq!(snap.position.is_some(), snap.phase == FsmPhase::ProfitWindow);

        if let Some(duration) = snap.wait_window_duration_ms {
            assert!(duration >= 0, "WAIT_WINDOW duration must never be negative");
        }
    }
}

proptest! {
    #[test]
    fn long_side_invariants_hold_over_random_ticks(
        deltas in prop::collection::vec(
            (50.0f64..500.0, 1i64..5_000),
            1..200,
        )
    ) {
        run_sequence(OrderSide::Buy, deltas);
    }

    #[test]
    fn short_side_invariants_hold_over_random_ticks(
        deltas in prop::collection::vec(
            (50.0f64..500.0, 1i64..5_000),
            1..200,
        )
    ) {
        run_sequence(OrderSide::Sell, deltas);
    }
}
