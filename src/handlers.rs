use crate::calendar::{self, MonthGrid};
use crate::errors::AppError;
use crate::form::ActivityForm;
use crate::insight::get_health_insights;
use crate::models::{
    Activity, ActivityInput, CalendarQuery, InsightResponse, NewActivity, StatsResponse, Tab,
};
use crate::state::AppState;
use crate::stats::build_stats;
use crate::storage::persist_data;
use crate::ui::{render_index, PageView};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};
use chrono::Local;
use tracing::{debug, info};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let ui = state.ui.lock().await.clone();
    let data = state.data.lock().await;

    let view = PageView {
        today: today(),
        stats: build_stats(&data.activities),
        insight: &data.last_insight,
        insight_loading: ui.insight_loading,
        active_tab: ui.active_tab,
        grid: calendar::build_month_grid(ui.calendar_month, &data.activities),
        form: &ui.form,
        recent: data.recent_activities(),
    };
    Html(render_index(&view))
}

pub async fn select_tab(
    State(state): State<AppState>,
    Path(tab): Path<String>,
) -> Result<Redirect, AppError> {
    let tab = Tab::parse(&tab).ok_or_else(|| AppError::bad_request("unknown tab"))?;
    state.ui.lock().await.show(tab, today());
    Ok(Redirect::to("/"))
}

pub async fn calendar_prev(State(state): State<AppState>) -> Redirect {
    let mut ui = state.ui.lock().await;
    ui.calendar_month = calendar::prev_month(ui.calendar_month);
    Redirect::to("/")
}

pub async fn calendar_next(State(state): State<AppState>) -> Redirect {
    let mut ui = state.ui.lock().await;
    ui.calendar_month = calendar::next_month(ui.calendar_month);
    Redirect::to("/")
}

pub async fn submit_form(
    State(state): State<AppState>,
    Form(input): Form<ActivityInput>,
) -> Result<Redirect, AppError> {
    let mut ui = state.ui.lock().await;
    ui.form.apply(input);
    let mut form = ui.form.clone();
    match form.submit() {
        Ok(new_activity) => {
            add_activity(&state, new_activity).await?;
            ui.form = form;
            ui.show(Tab::Calendar, today());
        }
        Err(rejection) => debug!("form submission ignored: {rejection}"),
    }
    Ok(Redirect::to("/"))
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    remove_activity(&state, &id).await?;
    Ok(Redirect::to("/"))
}

pub async fn refresh_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    refresh_insight(&state).await?;
    Ok(Redirect::to("/"))
}

pub async fn list_activities(State(state): State<AppState>) -> Json<Vec<Activity>> {
    Json(state.data.lock().await.activities.clone())
}

pub async fn recent_activities(State(state): State<AppState>) -> Json<Vec<Activity>> {
    Json(state.data.lock().await.recent_activities())
}

pub async fn create_activity(
    State(state): State<AppState>,
    Json(input): Json<ActivityInput>,
) -> Result<(StatusCode, Json<Activity>), AppError> {
    let mut form = ActivityForm::new(today());
    form.apply(input);
    let new_activity = form
        .submit()
        .map_err(|rejection| AppError::bad_request(rejection.to_string()))?;

    let activity = add_activity(&state, new_activity).await?;
    state.ui.lock().await.show(Tab::Calendar, today());
    Ok((StatusCode::CREATED, Json(activity)))
}

pub async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if remove_activity(&state, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("no activity with id {id}")))
    }
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let data = state.data.lock().await;
    Json(build_stats(&data.activities))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<MonthGrid>, AppError> {
    let reference = match query.month.as_deref() {
        Some(month) => calendar::parse_month(month)
            .ok_or_else(|| AppError::bad_request("month must be formatted as YYYY-MM"))?,
        None => state.ui.lock().await.calendar_month,
    };

    let data = state.data.lock().await;
    Ok(Json(calendar::build_month_grid(reference, &data.activities)))
}

pub async fn get_insight(State(state): State<AppState>) -> Json<InsightResponse> {
    let loading = state.ui.lock().await.insight_loading;
    let insight = state.data.lock().await.last_insight.clone();
    Json(InsightResponse { insight, loading })
}

pub async fn post_insight(State(state): State<AppState>) -> Result<Json<InsightResponse>, AppError> {
    let insight = refresh_insight(&state).await?;
    let loading = state.ui.lock().await.insight_loading;
    Ok(Json(InsightResponse { insight, loading }))
}

async fn add_activity(state: &AppState, new_activity: NewActivity) -> Result<Activity, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let activity = next.add_activity(new_activity);
    persist_data(&state.data_path, &next).await?;
    *data = next;

    info!(id = %activity.id, date = %activity.date, "activity added");
    Ok(activity)
}

async fn remove_activity(state: &AppState, id: &str) -> Result<bool, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    if !next.remove_activity(id) {
        return Ok(false);
    }
    persist_data(&state.data_path, &next).await?;
    *data = next;

    info!(%id, "activity deleted");
    Ok(true)
}

/// Concurrent refreshes are allowed; whichever finishes last wins.
async fn refresh_insight(state: &AppState) -> Result<String, AppError> {
    state.ui.lock().await.insight_loading = true;
    let activities = state.data.lock().await.activities.clone();

    let insight = get_health_insights(state.insight.as_ref(), &activities).await;

    state.ui.lock().await.insight_loading = false;
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    next.last_insight = insight.clone();
    persist_data(&state.data_path, &next).await?;
    *data = next;

    Ok(insight)
}

fn today() -> chrono::NaiveDate {
    Local::now().date_naive()
}
