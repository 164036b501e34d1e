//! Image prefetching for upcoming cards.
//!
//! After every deck change the session asks a prefetcher to warm the primary
//! photos of the next few cards. Failures never reach the deck.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Prefetch errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PrefetchError {
    /// An image could not be fetched.
    #[error("failed to fetch {url}: {reason}")]
    Fetch {
        /// Image URL.
        url: String,
        /// What went wrong.
        reason: String,
    },
}

/// Warms an image cache.
#[async_trait]
pub trait ImagePrefetcher: Send + Sync {
    /// Warm every URL. Returns the first failure, after trying all of them.
    async fn prefetch(&self, urls: &[String]) -> Result<(), PrefetchError>;
}

/// Prefetcher that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPrefetcher;

#[async_trait]
impl ImagePrefetcher for NoopPrefetcher {
    async fn prefetch(&self, _urls: &[String]) -> Result<(), PrefetchError> {
        Ok(())
    }
}

/// Downloads images over HTTP and remembers which ones are warm.
#[derive(Debug, Clone)]
pub struct HttpPrefetcher {
    http: reqwest::Client,
    warmed: Arc<Mutex<HashSet<String>>>,
}

impl HttpPrefetcher {
    /// Create a prefetcher with a per-image timeout.
    pub fn new(timeout: Duration) -> Result<Self, PrefetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PrefetchError::Fetch {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            http,
            warmed: Arc::new(Mutex::new(HashSet::new())),
        })
    }

    /// Check whether `url` was fetched successfully before.
    pub fn is_warm(&self, url: &str) -> bool {
        self.warmed
            .lock()
            .map(|warmed| warmed.contains(url))
            .unwrap_or(false)
    }

    /// URLs from `urls` not yet warm.
    fn cold<'a>(&self, urls: &'a [String]) -> Vec<&'a String> {
        match self.warmed.lock() {
            Ok(warmed) => urls.iter().filter(|u| !warmed.contains(*u)).collect(),
            Err(_) => urls.iter().collect(),
        }
    }

    async fn fetch_one(&self, url: &str) -> Result<(), PrefetchError> {
        let fail = |reason: String| PrefetchError::Fetch {
            url: url.to_string(),
            reason,
        };
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fail(format!("status {}", response.status())));
        }
        response.bytes().await.map_err(|e| fail(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ImagePrefetcher for HttpPrefetcher {
    async fn prefetch(&self, urls: &[String]) -> Result<(), PrefetchError> {
        let mut first_error = None;
        for url in self.cold(urls) {
            match self.fetch_one(url).await {
                Ok(()) => {
                    debug!(%url, "Prefetched image");
                    if let Ok(mut warmed) = self.warmed.lock() {
                        warmed.insert(url.clone());
                    }
                }
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
