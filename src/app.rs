use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/tab/:tab", post(handlers::select_tab))
        .route("/calendar/prev", post(handlers::calendar_prev))
        .route("/calendar/next", post(handlers::calendar_next))
        .route("/activities", post(handlers::submit_form))
        .route("/activities/:id/delete", post(handlers::delete_form))
        .route("/insight/refresh", post(handlers::refresh_form))
        .route(
            "/api/activities",
            get(handlers::list_activities).post(handlers::create_activity),
        )
        .route("/api/activities/recent", get(handlers::recent_activities))
        .route("/api/activities/:id", delete(handlers::delete_activity))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/calendar", get(handlers::get_calendar))
        .route(
            "/api/insight",
            get(handlers::get_insight).post(handlers::post_insight),
        )
        .with_state(state)
}
