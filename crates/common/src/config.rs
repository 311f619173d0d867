/// All configuration loaded from environment variables at startup.
/// Every field here has a default, so a bare `cargo run` never panics;
/// only a malformed (not missing) value panics, with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    /// Instrument symbol, used only to key the snapshot file and for logging.
    pub symbol: String,
    pub port: u16,
    pub log_level: String,

    /// Directory the snapshot file lives under.
    pub data_dir: String,
    /// How often the combined FSM/session/P&L state is written to disk.
    pub snapshot_interval_secs: u64,

    /// Negative number: daily realized P&L at or below this halts live trading.
    pub daily_loss_limit: f64,

    /// Bearer token guarding the mutating API endpoints. `None` disables auth
    /// (local/dev use only).
    pub api_token: Option<String>,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present. Panics only on a present-but-malformed value.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        Config {
            symbol: optional_env("SYMBOL").unwrap_or_else(|| "BTCUSDT".to_string()),
            port: optional_env("PORT")
                .map(|v| {
                    v.parse()
                        .unwrap_or_else(|_| panic!("PORT must be a valid port number, got '{v}'"))
                })
                .unwrap_or(3000),
            log_level: optional_env("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            data_dir: optional_env("DATA_DIR").unwrap_or_else(|| "./data".to_string()),
            snapshot_interval_secs: optional_env("SNAPSHOT_INTERVAL_SECS")
                .map(|v| {
                    v.parse().unwrap_or_else(|_| {
                        panic!("SNAPSHOT_INTERVAL_SECS must be a positive integer, got '{v}'")
                    })
                })
                .unwrap_or(60),
            daily_loss_limit: optional_env("DAILY_LOSS_LIMIT")
                .map(|v| {
                    v.parse().unwrap_or_else(|_| {
                        panic!("DAILY_LOSS_LIMIT must be a number, got '{v}'")
                    })
                })
                .unwrap_or(-500.0),
            api_token: optional_env("API_TOKEN"),
        }
    }
}

impl Config {
    /// WebSocket URL for the raw trade stream of `symbol`. Overridable via
    /// `MARKET_DATA_URL` for testing against a local fixture server instead
    /// of the live exchange.
    pub fn market_data_url(&self) -> String {
        optional_env("MARKET_DATA_URL").unwrap_or_else(|| {
            format!("wss://stream.binance.com:9443/ws/{}@trade", self.symbol.to_lowercase())
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
