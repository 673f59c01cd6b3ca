use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/vocabulary", get(handlers::get_vocabulary))
        .route("/api/session", get(handlers::get_session))
        .route("/api/month", get(handlers::get_month))
        .route("/api/month/navigate", post(handlers::navigate))
        .route("/api/dates/:date", get(handlers::get_date))
        .route("/api/dates/:date/entries", post(handlers::add_entry))
        .route("/api/dates/:date/entries/:index", delete(handlers::remove_entry))
        .with_state(state)
}
