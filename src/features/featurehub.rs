//! FeatureHub client
//!
//! Reads flag state from a FeatureHub Edge server:
//! `GET {url}/features/?apiKey={key}`. The whole flag list comes back in one
//! response and is reused for a few seconds, including after a failed fetch.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;

use super::FeatureToggle;

/// Default lifetime of a fetched flag list
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5);

/// Feature lookup errors
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("FeatureHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feature '{0}' is not defined")]
    Unknown(String),
}

/// One environment in the Edge response
#[derive(Debug, Deserialize)]
struct FeatureEnvironment {
    #[serde(default)]
    features: Vec<FeatureState>,
}

#[derive(Debug, Deserialize)]
struct FeatureState {
    key: String,
    #[serde(default)]
    value: Option<serde_json::Value>,
}

type FlagStates = HashMap<String, bool>;

/// Flatten environments into flag key -> on; only a boolean `true` counts as on
fn flag_states(environments: &[FeatureEnvironment]) -> FlagStates {
    let mut states = FlagStates::new();
    for state in environments.iter().flat_map(|env| env.features.iter()) {
        states
            .entry(state.key.clone())
            .or_insert(matches!(state.value, Some(serde_json::Value::Bool(true))));
    }
    states
}

fn flag_state(states: &FlagStates, flag: &str) -> Result<bool, FeatureError> {
    states
        .get(flag)
        .copied()
        .ok_or_else(|| FeatureError::Unknown(flag.to_string()))
}

struct CachedStates {
    fetched_at: Instant,
    /// `None` when the fetch failed
    states: Option<Arc<FlagStates>>,
}

/// Flags backed by a FeatureHub Edge server
#[derive(Clone)]
pub struct FeatureHubToggles {
    client: reqwest::Client,
    url: String,
    api_key: String,
    cache_ttl: Duration,
    cache: Arc<Mutex<Option<CachedStates>>>,
}

impl FeatureHubToggles {
    pub fn new(url: &str, api_key: &str) -> Result<Self, FeatureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(3))
            .build()?;

        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache: Arc::new(Mutex::new(None)),
        })
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    async fn fetch(&self) -> Result<FlagStates, FeatureError> {
        let environments: Vec<FeatureEnvironment> = self
            .client
            .get(format!("{}/features/", self.url))
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(flag_states(&environments))
    }

    /// Cached flag list. Concurrent callers share a single fetch.
    async fn states(&self) -> Option<Arc<FlagStates>> {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.fetched_at.elapsed() < self.cache_ttl {
                return cached.states.clone();
            }
        }

        tracing::debug!(url = %self.url, "Fetching feature flags");
        let states = match self.fetch().await {
            Ok(states) => Some(Arc::new(states)),
            Err(e) => {
                tracing::error!("Failed to read feature flags: {}", e);
                None
            }
        };

        *cache = Some(CachedStates {
            fetched_at: Instant::now(),
            states: states.clone(),
        });
        states
    }
}

fn lookup(states: Option<&FlagStates>, flag: &str) -> bool {
    let Some(states) = states else {
        return false;
    };
    match flag_state(states, flag) {
        Ok(enabled) => enabled,
        Err(e) => {
            tracing::warn!("{}", e);
            false
        }
    }
}

#[async_trait]
impl FeatureToggle for FeatureHubToggles {
    async fn is_enabled(&self, flag: &str) -> bool {
        lookup(self.states().await.as_deref(), flag)
    }

    async fn enabled_among(&self, flags: &[&str]) -> HashSet<String> {
        let states = self.states().await;
        flags
            .iter()
            .filter(|flag| lookup(states.as_deref(), flag))
            .map(|flag| flag.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::routing::get;
    use axum::{Json, Router};

    const SAMPLE: &str = r#"[{
        "id": "env-1",
        "features": [
            {"id": "a", "key": "weight-microgram", "type": "BOOLEAN", "value": true, "version": 2},
            {"id": "b", "key": "weight-milligram", "type": "BOOLEAN", "value": false, "version": 1},
            {"id": "c", "key": "banner-text", "type": "STRING", "value": "true"},
            {"id": "d", "key": "unset-flag", "type": "BOOLEAN"}
        ]
    }]"#;

    fn sample() -> FlagStates {
        let environments: Vec<FeatureEnvironment> = serde_json::from_str(SAMPLE).unwrap();
        flag_states(&environments)
    }

    /// Local Edge stand-in that counts requests
    async fn serve_flags(hits: Arc<AtomicUsize>) -> String {
        let body: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        let app = Router::new().route(
            "/features/",
            get(move || {
                let hits = Arc::clone(&hits);
                let body = body.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_flag_state() {
        let states = sample();
        assert!(flag_state(&states, "weight-microgram").unwrap());
        assert!(!flag_state(&states, "weight-milligram").unwrap());
        assert!(!flag_state(&states, "banner-text").unwrap());
        assert!(!flag_state(&states, "unset-flag").unwrap());
    }

    #[test]
    fn test_unknown_flag() {
        let err = flag_state(&sample(), "nope").unwrap_err();
        assert!(matches!(err, FeatureError::Unknown(ref f) if f == "nope"));
    }

    #[tokio::test]
    async fn test_one_fetch_serves_many_lookups() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = serve_flags(Arc::clone(&hits)).await;
        let toggles = FeatureHubToggles::new(&url, "key").unwrap();

        let enabled = toggles
            .enabled_among(&["weight-microgram", "weight-milligram", "missing"])
            .await;
        assert_eq!(enabled, HashSet::from(["weight-microgram".to_string()]));
        assert!(toggles.is_enabled("weight-microgram").await);
        assert!(!toggles.is_enabled("weight-milligram").await);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_cache_refetches() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = serve_flags(Arc::clone(&hits)).await;
        let toggles = FeatureHubToggles::new(&url, "key")
            .unwrap()
            .with_cache_ttl(Duration::ZERO);

        assert!(toggles.is_enabled("weight-microgram").await);
        assert!(toggles.is_enabled("weight-microgram").await);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unreachable_server_reads_as_disabled() {
        let toggles = FeatureHubToggles::new("http://127.0.0.1:9", "key").unwrap();
        assert!(!toggles.is_enabled("weight-microgram").await);
        // The failure is cached, so the second lookup does not wait on the network
        let started = Instant::now();
        assert!(toggles.enabled_among(&["weight-microgram"]).await.is_empty());
        assert!(started.elapsed() < Duration::from_millis(500));
    }
}
