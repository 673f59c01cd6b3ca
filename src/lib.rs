pub mod aggregate;
pub mod app;
pub mod calendar;
pub mod codec;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod local_store;
pub mod models;
pub mod remote_store;
pub mod session;
pub mod state;
pub mod storage;
pub mod timerange;
pub mod vocab;

pub use app::router;
pub use config::{ServerConfig, StoreConfig};
pub use session::Session;
pub use state::AppState;
pub use storage::{initialize, Store};
