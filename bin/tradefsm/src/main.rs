use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::{AppState, Core, CoreState};
use common::{snapshot, Config, Tick};
use engine::MarketDataStream;
use relay::RelayRegistry;
use signal::SignalBus;

#[tokio::main]
async fn main() {
    let cfg = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level)))
        .init();
    info!(symbol = %cfg.symbol, port = cfg.port, "tradefsm starting");

    // ── Restore or start cold ───────────────────────────────────────────────
    let snapshot_path = snapshot::snapshot_path(&cfg.data_dir, &cfg.symbol);
    let restored: Option<CoreState> = snapshot::load(&snapshot_path).await;

    let core = match restored {
        Some(state) => {
            let mut core = Core::restore(cfg.daily_loss_limit, state);
            core.catch_up(chrono::Utc::now().timestamp_millis());
            core
        }
        None => Core::new(cfg.daily_loss_limit),
    };
    let core = Arc::new(Mutex::new(core));

    // ── Signal bus and relay registry ───────────────────────────────────────
    let signal_bus = Arc::new(SignalBus::new());
    let relay_registry = Arc::new(RelayRegistry::new());

    // The webhook route publishes to the bus; this is the bus's only
    // subscriber, closing the loop back into the FSM through decoupled
    // pub/sub rather than a direct function call from the route handler.
    {
        let core = core.clone();
        signal_bus.subscribe(move |side, ts| {
            core.lock().unwrap().handle_signal(side, ts);
        });
    }

    let state = AppState {
        core: core.clone(),
        signal_bus: signal_bus.clone(),
        relay_registry: relay_registry.clone(),
        relay_client: reqwest::Client::new(),
        symbol: cfg.symbol.clone(),
        api_token: cfg.api_token.clone(),
    };

    // ── Market data ingestion ────────────────────────────────────────────────
    let (tick_tx, mut tick_rx) = mpsc::channel::<Tick>(256);
    let ws_url = cfg
        .market_data_url()
        .parse()
        .unwrap_or_else(|e| panic!("invalid market data URL: {e}"));
    tokio::spawn(MarketDataStream::new(ws_url, tick_tx).run());

    {
        let core = core.clone();
        tokio::spawn(async move {
            while let Some(tick) = tick_rx.recv().await {
                core.lock().unwrap().handle_tick(tick);
            }
            info!("Market data channel closed, tick dispatcher exiting");
        });
    }

    // ── Periodic snapshot writer ─────────────────────────────────────────────
    {
        let core = core.clone();
        let path = snapshot_path.clone();
        let interval = Duration::from_secs(cfg.snapshot_interval_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let state = core.lock().unwrap().to_state();
                snapshot::save(&path, &state).await;
            }
        });
    }

    // ── API server ───────────────────────────────────────────────────────────
    let port = cfg.port;
    tokio::spawn(api::serve(state, port));

    info!("All subsystems started. Waiting for shutdown signal.");
    tokio::signal::ctrl_c().await.unwrap();

    let final_state = core.lock().unwrap().to_state();
    snapshot::save(&snapshot_path, &final_state).await;
    info!("Shutdown signal received, snapshot saved, exiting.");
}
