pub mod bus;
pub mod history;
pub mod webhook;

pub use bus::SignalBus;
pub use history::{SignalEvent, SignalHistory};
pub use webhook::parse_webhook_text;
