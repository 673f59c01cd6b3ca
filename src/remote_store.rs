//! Remote document-store backend.
//!
//! Every date is one document in the `memos` collection with id
//! `<YYYY-MM-DD>_<department>`. Reads list all documents tagged with the
//! department and filter by date prefix on this side.

use crate::codec::{join_entries, split_entries};
use crate::config::RemoteConfig;
use crate::errors::StoreError;
use crate::models::{DateKey, MonthSnapshot, YearMonth};
use crate::storage::EntryBackend;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const COLLECTION: &str = "memos";

/// Wire shape of one stored date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub content: String,
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

pub struct RemoteStore {
    client: Client,
    base_url: String,
    token: Option<String>,
    department_id: String,
}

impl RemoteStore {
    pub fn connect(config: &RemoteConfig, department_id: &str) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
            department_id: department_id.to_string(),
        })
    }

    pub fn document_id(&self, date: DateKey) -> String {
        format!("{date}_{}", self.department_id)
    }

    fn collection_url(&self) -> String {
        format!("{}/{COLLECTION}", self.base_url)
    }

    fn document_url(&self, date: DateKey) -> String {
        format!("{}/{}", self.collection_url(), self.document_id(date))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn date_of(&self, id: &str) -> Option<DateKey> {
        let suffix = format!("_{}", self.department_id);
        id.strip_suffix(&suffix)?.parse().ok()
    }
}

#[async_trait]
impl EntryBackend for RemoteStore {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn load_month(&self, month: YearMonth) -> Result<MonthSnapshot, StoreError> {
        let request = self
            .client
            .get(self.collection_url())
            .query(&[("department", self.department_id.as_str())]);
        let response = self.authorize(request).send().await?;
        if !response.status().is_success() {
            return Err(StoreError::Remote {
                operation: "fetch",
                status: response.status().as_u16(),
            });
        }
        let documents: Vec<RemoteDocument> = response.json().await?;

        let prefix = month.prefix();
        let mut snapshot = MonthSnapshot::new();
        for document in documents {
            if document.department != self.department_id || !document.id.starts_with(&prefix) {
                continue;
            }
            match self.date_of(&document.id) {
                Some(date) => {
                    snapshot.insert(date, split_entries(&document.content));
                }
                None => debug!(id = %document.id, "skipping document with foreign id"),
            }
        }
        Ok(snapshot)
    }

    async fn save_date(&self, date: DateKey, entries: &[String]) -> Result<(), StoreError> {
        let url = self.document_url(date);
        if entries.is_empty() {
            let response = self.authorize(self.client.delete(url)).send().await?;
            let status = response.status();
            if status.is_success() || status == StatusCode::NOT_FOUND {
                info!(%date, "deleted remote record");
                return Ok(());
            }
            return Err(StoreError::Remote {
                operation: "delete",
                status: status.as_u16(),
            });
        }

        let document = RemoteDocument {
            id: self.document_id(date),
            content: join_entries(entries),
            department: self.department_id.clone(),
            updated_at: Some(Utc::now().to_rfc3339()),
        };
        let response = self
            .authorize(self.client.put(url))
            .json(&document)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StoreError::Remote {
                operation: "save",
                status: response.status().as_u16(),
            });
        }
        info!(%date, count = entries.len(), "saved remote record");
        Ok(())
    }
}
