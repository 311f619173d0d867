use common::OrderSide;
use serde::Serialize;
use tokio::time::Duration;
use tracing::warn;

/// Per-relay send timeout.
const RELAY_TIMEOUT: Duration = Duration::from_secs(5);

/// Body posted to each registered relay on an accepted webhook signal.
#[derive(Debug, Clone, Serialize)]
pub struct RelayPayload {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub side: OrderSide,
    #[serde(rename = "rawMessage")]
    pub raw_message: String,
    pub ts: i64,
}

impl RelayPayload {
    pub fn new(side: OrderSide, raw_message: String, ts: i64) -> Self {
        Self {
            message: format!("Accepted {}", if side == OrderSide::Buy { "Entry" } else { "Exit" }),
            kind: "tradingview-signal",
            side,
            raw_message,
            ts,
        }
    }
}

/// Fire-and-forget POST of `payload` to every `url`, each bounded by
/// `RELAY_TIMEOUT` and never blocking the caller — it does not block the
/// webhook response.
pub fn fan_out(client: reqwest::Client, urls: Vec<String>, payload: RelayPayload) {
    for url in urls {
        let client = client.clone();
        let payload = payload.clone();
        tokio::spawn(async move {
            let result = tokio::time::timeout(
                RELAY_TIMEOUT,
                client.post(&url).json(&payload).send(),
            )
            .await;

            match result {
                Ok(Ok(resp)) if !resp.status().is_success() => {
                    warn!(url, status = %resp.status(), "Relay responded with non-2xx status");
                }
                Ok(Err(e)) => warn!(url, error = %e, "Relay POST failed"),
                Err(_) => warn!(url, "Relay POST timed out"),
                Ok(Ok(_)) => {}
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_message_matches_side() {
        let payload = RelayPayload::new(OrderSide::Buy, "Accepted Entry".into(), 1000);
        assert_eq!(payload.message, "Accepted Entry");
        let payload = RelayPayload::new(OrderSide::Sell, "Accepted Exit".into(), 1000);
        assert_eq!(payload.message, "Accepted Exit");
    }
}
