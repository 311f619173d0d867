use std::sync::Mutex;

use common::OrderSide;
use tracing::debug;

type Subscriber = Box<dyn Fn(OrderSide, i64) + Send + Sync>;

/// Pub/sub over the BUY/SELL topics. Delivery is one-shot,
/// synchronous with the publisher, and in subscriber registration order —
/// there is no internal buffering or backpressure, so subscribers (the FSM
/// dispatcher) must not block.
#[derive(Default)]
pub struct SignalBus {
    subscribers: Mutex<Vec<Subscriber>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(OrderSide, i64) + Send + Sync + 'static,
    {
        self.subscribers.lock().unwrap().push(Box::new(handler));
    }

    /// Publish `side` to every subscriber, in registration order.
    pub fn publish(&self, side: OrderSide, ts: i64) {
        debug!(%side, ts, "Publishing signal");
        for subscriber in self.subscribers.lock().unwrap().iter() {
            subscriber(side, ts);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn delivers_to_all_subscribers_in_registration_order() {
        let bus = SignalBus::new();
        let order: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));

        let o1 = order.clone();
        bus.subscribe(move |_, _| o1.lock().unwrap().push(1));
        let o2 = order.clone();
        bus.subscribe(move |_, _| o2.lock().unwrap().push(2));

        bus.publish(OrderSide::Buy, 1000);

        assert_eq!(*order.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn publish_is_one_shot_per_call() {
        let bus = SignalBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        bus.subscribe(move |_, _| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish(OrderSide::Sell, 1);
        bus.publish(OrderSide::Sell, 2);

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
