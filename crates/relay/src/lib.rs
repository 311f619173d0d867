pub mod fanout;
pub mod registry;

pub use fanout::{fan_out, RelayPayload};
pub use registry::RelayRegistry;
