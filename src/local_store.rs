use crate::codec::{join_entries, split_entries};
use crate::errors::StoreError;
use crate::models::{DateKey, MonthSnapshot, YearMonth};
use crate::storage::EntryBackend;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error};

/// Date key to joined entry string, keyed by the bare `YYYY-MM-DD`.
pub type LocalData = BTreeMap<String, String>;

/// Keeps every date in one JSON object file.
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EntryBackend for LocalStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn load_month(&self, month: YearMonth) -> Result<MonthSnapshot, StoreError> {
        let data = load_data(&self.path).await;
        let prefix = month.prefix();
        let mut snapshot = MonthSnapshot::new();
        for (key, content) in data.iter().filter(|(key, _)| key.starts_with(&prefix)) {
            match key.parse::<DateKey>() {
                Ok(date) => {
                    snapshot.insert(date, split_entries(content));
                }
                Err(err) => debug!("skipping stored record: {err}"),
            }
        }
        Ok(snapshot)
    }

    async fn save_date(&self, date: DateKey, entries: &[String]) -> Result<(), StoreError> {
        let mut data = read_data(&self.path).await?;
        if entries.is_empty() {
            data.remove(&date.to_string());
        } else {
            data.insert(date.to_string(), join_entries(entries));
        }
        persist_data(&self.path, &data).await
    }
}

/// Missing or unreadable files load as empty.
pub async fn load_data(path: &Path) -> LocalData {
    read_data(path).await.unwrap_or_else(|err| {
        error!("failed to load data file: {err}");
        LocalData::default()
    })
}

/// Only a missing file reads as empty. Writes go through here so a file
/// that cannot be read back is never overwritten.
pub async fn read_data(path: &Path) -> Result<LocalData, StoreError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(LocalData::default()),
        Err(err) => Err(err.into()),
    }
}

pub async fn persist_data(path: &Path, data: &LocalData) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}
