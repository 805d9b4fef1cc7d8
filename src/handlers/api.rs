use axum::extract::{Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppResult;
use crate::handlers::ViewParams;
use crate::models::{AreaChart, ListTable, QueryMode, Treemap, ViewState, YearlySummary};
use crate::services::analytics::yearly_summary;
use crate::services::dataset::LoadReport;
use crate::services::drill_down::{current_data, reset as reset_view, QueryOutcome};
use crate::services::historical::{historical, HistoryTarget};
use crate::services::presentation::{area_chart, list_table, treemap};
use crate::state::AppState;
use crate::VERSION;

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub state: ViewState,
    pub fell_back_to_root: bool,
    pub treemap: Treemap,
    pub list: ListTable,
    pub summary: YearlySummary,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub state: ViewState,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub mode: QueryMode,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub state: ViewState,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub target: HistoryTarget,
    pub chart: AreaChart,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub ready: bool,
    pub version: &'static str,
    pub years: Vec<i32>,
    pub click_window_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<LoadReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
}

/// Everything the dashboard renders for a view state.
pub async fn view(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> AppResult<Json<ViewResponse>> {
    let view = params.to_state()?;
    let dataset = state.dataset()?;

    let outcome = current_data(view, &dataset, None, QueryMode::Refresh)?;
    let map = treemap(&outcome.tree, &outcome.state);
    let list = list_table(&outcome.tree, outcome.state.normalization);
    let summary = yearly_summary(&dataset, &outcome.state);

    Ok(Json(ViewResponse {
        state: outcome.state,
        fell_back_to_root: outcome.fell_back_to_root,
        treemap: map,
        list,
        summary,
    }))
}

pub async fn navigate(
    State(state): State<AppState>,
    Json(request): Json<NavigateRequest>,
) -> AppResult<Json<QueryOutcome>> {
    let dataset = state.dataset()?;
    debug!(
        item = request.item.as_deref().unwrap_or(""),
        mode = ?request.mode,
        "API navigate"
    );
    let outcome = current_data(
        request.state,
        &dataset,
        request.item.as_deref(),
        request.mode,
    )?;
    Ok(Json(outcome))
}

pub async fn reset(
    State(state): State<AppState>,
    Json(request): Json<ResetRequest>,
) -> AppResult<Json<QueryOutcome>> {
    let dataset = state.dataset()?;
    Ok(Json(reset_view(request.state, &dataset)?))
}

pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> AppResult<Json<HistoryResponse>> {
    let view = params.to_state()?;
    let item = params.require_item()?;
    let dataset = state.dataset()?;

    let target = view.history_target(item);
    let points = historical(dataset.ledger_for(&view), &target, dataset.years())?;
    let chart = area_chart(target.title(), &points, view.normalization);

    Ok(Json(HistoryResponse { target, chart }))
}

/// Readiness, load report or load failure; answers before the dataset is
/// published.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let dataset = state.dataset().ok();
    Json(StatusResponse {
        ready: dataset.is_some(),
        version: VERSION,
        years: dataset
            .as_ref()
            .map(|d| d.years().to_vec())
            .unwrap_or_default(),
        click_window_ms: state.click_window_millis(),
        report: dataset.map(|d| d.report().clone()),
        load_error: state.load_error().map(str::to_string),
    })
}
