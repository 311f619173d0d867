use common::{OrderIntent, PlacedOrder, TradeRecord, TradingMode};
use tracing::info;

use crate::pnl::PnlAccount;

/// Simulated fill engine. There is no live exchange behind this:
/// every order fills instantly and in full at the tick price the FSM
/// handed over, against the `PnlAccount` for the matching side.
#[derive(Debug, Default)]
pub struct PaperBroker;

impl PaperBroker {
    pub fn new() -> Self {
        Self
    }

    /// Apply `order` to `account`, dispatching on `intent` to open or close.
    /// Returns the trade record when the order closed a position; opens
    /// produce no trade record since no P&L is realized yet.
    pub fn submit(&self, order: PlacedOrder, mode: TradingMode, account: &mut PnlAccount) -> Option<TradeRecord> {
        if order.intent.is_open() {
            account.open(order.qty, order.price);
            info!(?order.intent, qty = order.qty, price = order.price, "Paper order filled (open)");
            None
        } else {
            let (_, record) = account.close(order.qty, order.price, order.cause, mode);
            info!(
                ?order.intent,
                qty = order.qty,
                price = order.price,
                realized = record.realized_pnl,
                "Paper order filled (close)"
            );
            Some(record)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{OrderCause, PositionSide};

    #[test]
    fn open_order_produces_no_trade_record() {
        let broker = PaperBroker::new();
        let mut account = PnlAccount::new(PositionSide::Long);
        let order = PlacedOrder {
            intent: OrderIntent::OpenLong,
            cause: OrderCause::TriggerHit,
            qty: 1.0,
            price: 100.0,
            ts: 0,
        };
        let record = broker.submit(order, TradingMode::Paper, &mut account);
        assert!(record.is_none());
        assert_eq!(account.position_qty, 1.0);
    }

    #[test]
    fn close_order_produces_trade_record() {
        let broker = PaperBroker::new();
        let mut account = PnlAccount::new(PositionSide::Long);
        account.open(1.0, 100.0);

        let order = PlacedOrder {
            intent: OrderIntent::CloseLong,
            cause: OrderCause::StopHit,
            qty: 1.0,
            price: 95.0,
            ts: 1,
        };
        let record = broker.submit(order, TradingMode::Paper, &mut account).unwrap();
        assert_eq!(record.cause, OrderCause::StopHit);
        assert!((record.realized_pnl + 5.0).abs() < 1e-9);
    }
}
