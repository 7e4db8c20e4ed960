use crate::aggregate::{aggregate_by_period, latest_day, room_timeline};
use crate::errors::AppError;
use crate::models::{
    AlignedStatisticsResponse, AppData, RoomTimelineResponse, StatisticsResponse, TimeslotUpload,
    TimeslotUploadResponse, YearsResponse,
};
use crate::query::{StatsQuery, Window, resolve_window};
use crate::report::aligned_report;
use crate::state::AppState;
use crate::storage::append_slots;
use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
pub struct RoomTimelineQuery {
    pub cat: Option<String>,
}

pub async fn get_statistics(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatisticsResponse>, AppError> {
    let data = state.data.read().await;
    let sparse = sparse_statistics(&data, &query)?
        .map(|(_, sparse)| sparse)
        .unwrap_or_default();
    Ok(Json(sparse))
}

pub async fn get_aligned_statistics(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<AlignedStatisticsResponse>, AppError> {
    let period = query.period()?;
    let data = state.data.read().await;
    let report = match sparse_statistics(&data, &query)? {
        Some((window, sparse)) => aligned_report(window.period, &window.axis, &sparse),
        None => aligned_report(period, &[], &StatisticsResponse::default()),
    };
    Ok(Json(report))
}

pub async fn get_years(State(state): State<AppState>) -> Json<YearsResponse> {
    let data = state.data.read().await;
    Json(YearsResponse { years: data.years() })
}

pub async fn get_room_timeline(
    State(state): State<AppState>,
    Query(query): Query<RoomTimelineQuery>,
) -> Result<Json<RoomTimelineResponse>, AppError> {
    let cat = query
        .cat
        .as_deref()
        .map(str::trim)
        .filter(|cat| !cat.is_empty())
        .ok_or_else(|| AppError::bad_request("missing cat"))?;

    let data = state.data.read().await;
    let timeline = match (data.cats.get(cat), latest_day(data.all_slots())) {
        (Some(slots), Some(day)) => room_timeline(slots, day),
        _ => RoomTimelineResponse {
            date: None,
            hours: Vec::new(),
            rooms: Vec::new(),
        },
    };
    Ok(Json(timeline))
}

pub async fn upload_timeslots(
    State(state): State<AppState>,
    Json(payload): Json<TimeslotUpload>,
) -> Result<Json<TimeslotUploadResponse>, AppError> {
    let cat = payload.cat.trim();
    if cat.is_empty() {
        return Err(AppError::bad_request("cat must not be empty"));
    }

    let received = payload.slots.len();
    let stored = append_slots(&state, cat, payload.slots).await?;
    info!(cat, received, stored, "stored timeslots");

    Ok(Json(TimeslotUploadResponse {
        cat: cat.to_string(),
        stored,
    }))
}

/// Sparse per-bucket counts for the cat and window named by `query`.
///
/// `Ok(None)` when no window can be resolved. An unknown cat simply has no slots.
fn sparse_statistics(data: &AppData, query: &StatsQuery) -> Result<Option<(Window, StatisticsResponse)>, AppError> {
    let cat = query.cat()?;
    if !data.cats.contains_key(cat) {
        debug!(cat, "statistics requested for unknown cat");
    }

    let Some(window) = resolve_window(query, data.year_bounds())? else {
        return Ok(None);
    };

    let in_window = data
        .slots_for(cat)
        .iter()
        .filter(|slot| window.contains(slot.date_slot));
    let sparse = aggregate_by_period(in_window, window.period.granularity());
    Ok(Some((window, sparse)))
}
