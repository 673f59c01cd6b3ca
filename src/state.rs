use crate::session::Session;
use crate::storage::Store;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handlers hold the session lock across store calls, so mutations run one
/// at a time.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(store: Store, session: Session) -> Self {
        Self {
            store,
            session: Arc::new(Mutex::new(session)),
        }
    }
}
