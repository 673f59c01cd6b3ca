use crate::aggregate::sort_entries;
use crate::codec::{build_entry, format};
use crate::errors::InvalidEntry;
use crate::models::{DateKey, EntryRequest, MonthSnapshot, YearMonth};
use crate::storage::Store;
use tracing::{error, info};

/// The in-memory view of one month plus the selected date.
#[derive(Debug, Clone)]
pub struct Session {
    month: YearMonth,
    selected: Option<DateKey>,
    entries: MonthSnapshot,
}

/// Result of a mutation. The in-memory change stays applied even when
/// `persisted` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub date: DateKey,
    pub entries: Vec<String>,
    pub persisted: bool,
    pub error: Option<String>,
}

impl Session {
    /// Loads today's month and selects today if it has entries, else the first.
    pub async fn open(store: &Store, today: DateKey) -> Self {
        let mut session = Self {
            month: today.month(),
            selected: None,
            entries: MonthSnapshot::new(),
        };
        session.load_month(store, today.month()).await;
        let initial = if session.entries.contains_key(&today) {
            today
        } else {
            session.month.first_day()
        };
        session.selected = Some(initial);
        session
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn selected(&self) -> Option<DateKey> {
        self.selected
    }

    pub fn snapshot(&self) -> &MonthSnapshot {
        &self.entries
    }

    pub fn entries_for(&self, date: DateKey) -> &[String] {
        self.entries.get(&date).map(Vec::as_slice).unwrap_or_default()
    }

    /// Replaces the snapshot with a freshly fetched month.
    pub async fn load_month(&mut self, store: &Store, month: YearMonth) {
        self.entries = store.fetch_month(month).await;
        self.month = month;
        info!(month = %month, dates = self.entries.len(), "loaded month");
    }

    /// Moves `offset` months and selects the first day there. `None` when
    /// the target month is out of range; the session is left as it was.
    pub async fn navigate(&mut self, store: &Store, offset: i32) -> Option<DateKey> {
        let target = self.month.offset(offset)?;
        self.load_month(store, target).await;
        let first = target.first_day();
        self.selected = Some(first);
        Some(first)
    }

    pub async fn select(&mut self, store: &Store, date: DateKey) {
        if !self.month.contains(date) {
            self.load_month(store, date.month()).await;
        }
        self.selected = Some(date);
    }

    /// Invalid input aborts before any state change.
    pub async fn add_entry(
        &mut self,
        store: &Store,
        date: DateKey,
        request: &EntryRequest,
    ) -> Result<SaveOutcome, InvalidEntry> {
        let encoded = format(&build_entry(request)?)?;
        self.select(store, date).await;

        let mut next = self.entries_for(date).to_vec();
        next.push(encoded);
        sort_entries(&mut next);
        self.entries.insert(date, next.clone());

        Ok(self.persist(store, date, next).await)
    }

    /// `None` when there is no entry at `index`.
    pub async fn remove_entry(
        &mut self,
        store: &Store,
        date: DateKey,
        index: usize,
    ) -> Option<SaveOutcome> {
        self.select(store, date).await;
        let current = self.entries_for(date);
        if index >= current.len() {
            return None;
        }
        let mut next = current.to_vec();
        next.remove(index);
        if next.is_empty() {
            self.entries.remove(&date);
        } else {
            self.entries.insert(date, next.clone());
        }

        Some(self.persist(store, date, next).await)
    }

    async fn persist(&self, store: &Store, date: DateKey, entries: Vec<String>) -> SaveOutcome {
        match store.save_date(date, &entries).await {
            Ok(()) => SaveOutcome {
                date,
                entries,
                persisted: true,
                error: None,
            },
            Err(err) => {
                error!(%date, "failed to save entries: {err}");
                SaveOutcome {
                    date,
                    entries,
                    persisted: false,
                    error: Some(err.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_store::{LocalStore, load_data};
    use crate::storage::EntryBackend;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn unique_path(label: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "duty_calendar_session_{label}_{}_{nanos}.json",
            std::process::id()
        ));
        path
    }

    fn key(raw: &str) -> DateKey {
        raw.parse().unwrap()
    }

    fn request(name: &str, duty: &str, incident: &str) -> EntryRequest {
        EntryRequest {
            center: Some("서교".to_string()),
            name: Some(name.to_string()),
            duty_type: Some(duty.to_string()),
            incident_type: Some(incident.to_string()),
            start_time: None,
            end_time: None,
        }
    }

    fn local_store(path: &PathBuf) -> Store {
        Store::new(Arc::new(LocalStore::new(path.clone())))
    }

    #[tokio::test]
    async fn open_selects_first_day_for_empty_month() {
        let store = local_store(&unique_path("open_empty"));
        let session = Session::open(&store, key("2024-03-15")).await;
        assert_eq!(session.month(), YearMonth::new(2024, 3).unwrap());
        assert_eq!(session.selected(), Some(key("2024-03-01")));
    }

    #[tokio::test]
    async fn open_selects_today_when_it_has_entries() {
        let path = unique_path("open_today");
        let backend = LocalStore::new(path.clone());
        backend
            .save_date(key("2024-03-15"), &["[서교]A(주간-연가)".to_string()])
            .await
            .unwrap();
        let session = Session::open(&local_store(&path), key("2024-03-15")).await;
        assert_eq!(session.selected(), Some(key("2024-03-15")));
    }

    #[tokio::test]
    async fn added_entries_are_sorted_and_persisted() {
        let path = unique_path("add");
        let store = local_store(&path);
        let mut session = Session::open(&store, key("2024-03-01")).await;
        let date = key("2024-03-05");

        for name in ["하늘", "가람", "나영"] {
            let outcome = session
                .add_entry(&store, date, &request(name, "주간", "연가"))
                .await
                .unwrap();
            assert!(outcome.persisted);
        }

        assert_eq!(
            session.entries_for(date),
            ["[서교]가람(주간-연가)", "[서교]나영(주간-연가)", "[서교]하늘(주간-연가)"]
        );
        let reloaded = store.fetch_month(date.month()).await;
        assert_eq!(reloaded[&date], session.entries_for(date));
    }

    #[tokio::test]
    async fn invalid_entry_leaves_state_untouched() {
        let path = unique_path("invalid");
        let store = local_store(&path);
        let mut session = Session::open(&store, key("2024-03-01")).await;
        let err = session
            .add_entry(&store, key("2024-03-05"), &request(" ", "주간", "연가"))
            .await
            .unwrap_err();
        assert_eq!(err, InvalidEntry::MissingField("name"));
        assert!(session.snapshot().is_empty());
        assert!(load_data(&path).await.is_empty());
    }

    #[tokio::test]
    async fn removing_last_entry_drops_the_date() {
        let path = unique_path("remove");
        let store = local_store(&path);
        let mut session = Session::open(&store, key("2024-03-01")).await;
        let date = key("2024-03-05");
        session
            .add_entry(&store, date, &request("가람", "야간", "병가"))
            .await
            .unwrap();

        assert!(session.remove_entry(&store, date, 3).await.is_none());
        let outcome = session.remove_entry(&store, date, 0).await.unwrap();
        assert!(outcome.entries.is_empty());
        assert!(!session.snapshot().contains_key(&date));
        assert!(!load_data(&path).await.contains_key("2024-03-05"));
        assert!(store.fetch_month(date.month()).await.is_empty());
    }

    #[tokio::test]
    async fn navigation_selects_first_day_of_target_month() {
        let store = local_store(&unique_path("navigate"));
        let mut session = Session::open(&store, key("2024-01-20")).await;
        let first = session.navigate(&store, -1).await.unwrap();
        assert_eq!(first, key("2023-12-01"));
        assert_eq!(session.month(), YearMonth::new(2023, 12).unwrap());
        assert_eq!(session.selected(), Some(first));
    }

    #[tokio::test]
    async fn navigation_out_of_range_keeps_the_session() {
        let store = local_store(&unique_path("navigate_range"));
        let mut session = Session::open(&store, key("2024-01-20")).await;
        assert_eq!(session.navigate(&store, i32::MAX).await, None);
        assert_eq!(session.navigate(&store, 10_000_000).await, None);
        assert_eq!(session.month(), YearMonth::new(2024, 1).unwrap());
        assert_eq!(session.selected(), Some(key("2024-01-01")));
    }

    #[tokio::test]
    async fn adding_outside_loaded_month_switches_months() {
        let store = local_store(&unique_path("switch"));
        let mut session = Session::open(&store, key("2024-03-01")).await;
        session
            .add_entry(&store, key("2024-04-02"), &request("가람", "당번", "공가"))
            .await
            .unwrap();
        assert_eq!(session.month(), YearMonth::new(2024, 4).unwrap());
        assert_eq!(session.selected(), Some(key("2024-04-02")));
    }

    #[tokio::test]
    async fn save_failure_keeps_optimistic_change() {
        // A directory path cannot be written as a file.
        let dir = std::env::temp_dir();
        let store = Store::new(Arc::new(LocalStore::new(dir)));
        let mut session = Session::open(&store, key("2024-03-01")).await;
        let date = key("2024-03-05");
        let outcome = session
            .add_entry(&store, date, &request("가람", "주간", "연가"))
            .await
            .unwrap();
        assert!(!outcome.persisted);
        assert!(outcome.error.is_some());
        assert_eq!(session.entries_for(date).len(), 1);
    }
}
