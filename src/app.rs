use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/statistics", get(handlers::get_statistics))
        .route("/api/statistics/aligned", get(handlers::get_aligned_statistics))
        .route("/api/statistics/years", get(handlers::get_years))
        .route("/api/statistics/room_timeline", get(handlers::get_room_timeline))
        .route("/api/timeslots", post(handlers::upload_timeslots))
        .with_state(state)
}
