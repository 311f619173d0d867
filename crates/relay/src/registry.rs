use std::collections::HashSet;

use common::{Error, Result};
use tokio::sync::RwLock;

/// In-memory set of registered relay URLs. No persistence —
/// relays are reconfigured per process lifetime, not carried in the snapshot.
#[derive(Default)]
pub struct RelayRegistry {
    urls: RwLock<HashSet<String>>,
}

impl RelayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `http(s)://` scheme before insertion.
    pub async fn add(&self, url: String) -> Result<()> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Other(format!("relay url '{url}' must use http:// or https://")));
        }
        self.urls.write().await.insert(url);
        Ok(())
    }

    pub async fn remove(&self, url: &str) -> bool {
        self.urls.write().await.remove(url)
    }

    pub async fn list(&self) -> Vec<String> {
        self.urls.read().await.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_non_http_scheme() {
        let registry = RelayRegistry::new();
        assert!(registry.add("ftp://example.com".to_string()).await.is_err());
    }

    #[tokio::test]
    async fn add_list_remove_round_trip() {
        let registry = RelayRegistry::new();
        registry.add("https://example.com/hook".to_string()).await.unwrap();
        assert_eq!(registry.list().await, vec!["https://example.com/hook".to_string()]);
        assert!(registry.remove("https://example.com/hook").await);
        assert!(registry.list().await.is_empty());
    }
}
