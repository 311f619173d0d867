use common::{Error, Result, Tick};
use futures_util::StreamExt;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info, warn};
use url::Url;

/// Reconnect policy: fixed 5s back-off, up to 10 attempts — deliberately
/// not exponential, since this public market-data ingress has no
/// rate-limit concerns to respect.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);
const MAX_RECONNECT_ATTEMPTS: u32 = 10;

/// Raw trade frame from the market data WebSocket.
#[derive(Debug, Deserialize)]
struct TradeFrame {
    p: String,
    #[serde(rename = "T")]
    t: i64,
}

/// Subscribes to a trade stream and converts frames into `Tick`s, forwarded
/// to every consumer (the dual FSM dispatcher, the P&L mark-price update)
/// over `tick_tx`.
pub struct MarketDataStream {
    url: Url,
    tick_tx: mpsc::Sender<Tick>,
}

impl MarketDataStream {
    pub fn new(url: Url, tick_tx: mpsc::Sender<Tick>) -> Self {
        Self { url, tick_tx }
    }

    /// Run the stream, reconnecting on disconnect up to `MAX_RECONNECT_ATTEMPTS`
    /// times with a fixed back-off. Returns once attempts are exhausted or the
    /// tick channel's receiver is dropped.
    pub async fn run(self) {
        let mut attempt = 0;
        loop {
            match self.connect_and_stream().await {
                Ok(()) => {
                    info!(url = %self.url, "Market data stream ended cleanly");
                    return;
                }
                Err(e) => {
                    attempt += 1;
                    warn!(url = %self.url, error = %e, attempt, "Market data stream disconnected");
                    if attempt >= MAX_RECONNECT_ATTEMPTS {
                        error!(url = %self.url, "Max reconnect attempts exhausted, giving up");
                        return;
                    }
                    sleep(RECONNECT_DELAY).await;
                }
            }
        }
    }

    async fn connect_and_stream(&self) -> Result<()> {
        let (ws_stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| Error::WebSocket(e.to_string()))?;
        info!(url = %self.url, "Market data stream connected");
        let (_, mut read) = ws_stream.split();

        while let Some(msg) = read.next().await {
            let msg = msg.map_err(|e| Error::WebSocket(e.to_string()))?;
            let Message::Text(text) = msg else { continue };

            match serde_json::from_str::<TradeFrame>(&text) {
                Ok(frame) => match frame.p.parse::<f64>() {
                    Ok(price) => {
                        if self.tick_tx.send(Tick::new(price, frame.t)).await.is_err() {
                            return Ok(()); // receiver gone, shut down quietly
                        }
                    }
                    Err(e) => warn!(error = %e, raw = %frame.p, "Unparseable trade price, dropping frame"),
                },
                Err(e) => warn!(error = %e, "Unparseable trade frame, dropping"),
            }
        }

        Err(Error::WebSocket("stream closed by peer".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_frame_parses_price_and_timestamp() {
        let frame: TradeFrame = serde_json::from_str(r#"{"p":"27123.45","T":1700000000123}"#).unwrap();
        assert_eq!(frame.t, 1700000000123);
        assert_eq!(frame.p.parse::<f64>().unwrap(), 27123.45);
    }
}
