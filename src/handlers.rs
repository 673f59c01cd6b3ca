use crate::calendar::{day_view, month_view};
use crate::errors::AppError;
use crate::models::{
    DateKey, DayView, EntryRequest, MonthQuery, MonthView, NavigateRequest, SaveResponse,
    SessionView, VocabularyResponse, YearMonth,
};
use crate::session::{SaveOutcome, Session};
use crate::state::AppState;
use crate::vocab::{Center, DutyType, IncidentType};
use axum::{
    extract::{Path, Query, State},
    Json,
};

pub async fn get_vocabulary() -> Json<VocabularyResponse> {
    Json(VocabularyResponse {
        centers: Center::ALL.iter().map(|center| center.label()).collect(),
        duty_types: DutyType::ALL.iter().map(|duty| duty.label()).collect(),
        incident_types: IncidentType::ALL.iter().map(|incident| incident.label()).collect(),
    })
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.session.lock().await;
    let selected = session
        .selected()
        .map(|date| day_view(date, session.entries_for(date)));
    Json(SessionView {
        month: current_month(&session),
        selected,
        backend: state.store.backend_name().to_string(),
    })
}

pub async fn get_month(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthView>, AppError> {
    let month = YearMonth::new(query.year, query.month)
        .ok_or_else(|| AppError::bad_request("month must be between 1 and 12"))?;
    let mut session = state.session.lock().await;
    session.load_month(&state.store, month).await;
    Ok(Json(current_month(&session)))
}

pub async fn navigate(
    State(state): State<AppState>,
    Json(payload): Json<NavigateRequest>,
) -> Result<Json<MonthView>, AppError> {
    let mut session = state.session.lock().await;
    session
        .navigate(&state.store, payload.offset)
        .await
        .ok_or_else(|| AppError::bad_request(format!("offset {} is out of range", payload.offset)))?;
    Ok(Json(current_month(&session)))
}

pub async fn get_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DayView>, AppError> {
    let date = parse_date(&date)?;
    let mut session = state.session.lock().await;
    session.select(&state.store, date).await;
    Ok(Json(day_view(date, session.entries_for(date))))
}

pub async fn add_entry(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(payload): Json<EntryRequest>,
) -> Result<Json<SaveResponse>, AppError> {
    let date = parse_date(&date)?;
    let mut session = state.session.lock().await;
    let outcome = session.add_entry(&state.store, date, &payload).await?;
    Ok(Json(to_response(outcome)))
}

pub async fn remove_entry(
    State(state): State<AppState>,
    Path((date, index)): Path<(String, usize)>,
) -> Result<Json<SaveResponse>, AppError> {
    let date = parse_date(&date)?;
    let mut session = state.session.lock().await;
    let outcome = session
        .remove_entry(&state.store, date, index)
        .await
        .ok_or_else(|| AppError::not_found(format!("no entry {index} on {date}")))?;
    Ok(Json(to_response(outcome)))
}

fn current_month(session: &Session) -> MonthView {
    month_view(session.month(), session.snapshot(), session.selected())
}

fn to_response(outcome: SaveOutcome) -> SaveResponse {
    SaveResponse {
        day: day_view(outcome.date, &outcome.entries),
        persisted: outcome.persisted,
        error: outcome.error,
    }
}

fn parse_date(raw: &str) -> Result<DateKey, AppError> {
    raw.parse::<DateKey>()
        .map_err(|err| AppError::bad_request(err.to_string()))
}
