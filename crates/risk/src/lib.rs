pub mod session;

pub use session::{SessionConfig, SessionManager, SessionSnapshot, SessionState};
