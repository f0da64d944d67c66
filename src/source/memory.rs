//! In-memory fetcher with scripted payloads

use super::fetcher::Fetcher;
use crate::error::FetchError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Script {
    Respond(Value),
    Fail,
}

#[derive(Debug, Default)]
struct Inner {
    scripts: HashMap<String, Script>,
    delays: HashMap<String, Duration>,
    calls: HashMap<String, usize>,
}

/// Fetcher that serves canned JSON payloads keyed by resource id
///
/// Unknown resources fail with [`FetchError::Status`] 404. Every call is
/// counted so callers can assert how many upstream requests were made.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    inner: Mutex<Inner>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `payload` for `resource` (replaces any previous script)
    pub fn respond(&self, resource: &str, payload: Value) -> &Self {
        self.lock()
            .scripts
            .insert(resource.to_string(), Script::Respond(payload));
        self
    }

    /// Fail every fetch of `resource` with a transport error
    pub fn fail(&self, resource: &str) -> &Self {
        self.lock().scripts.insert(resource.to_string(), Script::Fail);
        self
    }

    /// Sleep before answering `resource`
    pub fn delay(&self, resource: &str, delay: Duration) -> &Self {
        self.lock().delays.insert(resource.to_string(), delay);
        self
    }

    /// Number of fetches issued for `resource`
    pub fn calls(&self, resource: &str) -> usize {
        self.lock().calls.get(resource).copied().unwrap_or(0)
    }

    /// Number of fetches issued across all resources
    pub fn total_calls(&self) -> usize {
        self.lock().calls.values().sum()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, resource: &str) -> Result<Value, FetchError> {
        let (script, delay) = {
            let mut inner = self.lock();
            *inner.calls.entry(resource.to_string()).or_insert(0) += 1;
            (
                inner.scripts.get(resource).cloned(),
                inner.delays.get(resource).copied(),
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match script {
            Some(Script::Respond(payload)) => Ok(payload),
            Some(Script::Fail) => Err(FetchError::Transport {
                resource: resource.to_string(),
                cause: "connection reset".to_string(),
            }),
            None => Err(FetchError::Status {
                resource: resource.to_string(),
                status: 404,
            }),
        }
    }
}
