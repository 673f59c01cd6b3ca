use crate::aggregate::sort_entries;
use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::local_store::LocalStore;
use crate::models::{DateKey, MonthSnapshot, YearMonth};
use crate::remote_store::RemoteStore;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// A persistence strategy for per-date entry lists.
#[async_trait]
pub trait EntryBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Entries for every date in `month` that has at least one.
    async fn load_month(&self, month: YearMonth) -> Result<MonthSnapshot, StoreError>;

    /// Persists `entries` for `date`; an empty list deletes the record.
    async fn save_date(&self, date: DateKey, entries: &[String]) -> Result<(), StoreError>;
}

pub type BackendHandle = Arc<dyn EntryBackend>;

/// Picks the backend once: remote when configured and reachable to build,
/// local otherwise.
pub fn initialize(config: &StoreConfig) -> BackendHandle {
    if let Some(remote) = &config.remote {
        match RemoteStore::connect(remote, &config.department_id) {
            Ok(store) => {
                info!(base_url = %remote.base_url, "using remote entry store");
                return Arc::new(store);
            }
            Err(err) => warn!("remote store unavailable, falling back to local: {err}"),
        }
    }
    info!(path = %config.local_path.display(), "using local entry store");
    Arc::new(LocalStore::new(config.local_path.clone()))
}

#[derive(Clone)]
pub struct Store {
    backend: BackendHandle,
}

impl Store {
    pub fn new(backend: BackendHandle) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Never fails: a backend error degrades to an empty month.
    pub async fn fetch_month(&self, month: YearMonth) -> MonthSnapshot {
        let mut snapshot = match self.backend.load_month(month).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(month = %month, "failed to load entries, showing empty month: {err}");
                MonthSnapshot::new()
            }
        };
        snapshot.retain(|date, entries| month.contains(*date) && !entries.is_empty());
        for entries in snapshot.values_mut() {
            sort_entries(entries);
        }
        snapshot
    }

    pub async fn save_date(&self, date: DateKey, entries: &[String]) -> Result<(), StoreError> {
        self.backend.save_date(date, entries).await
    }
}
