use askama::Template;
use axum::extract::{Query, State};
use axum::response::Html;
use tracing::debug;

use crate::date_utils::supported_years;
use crate::error::{AppResult, RenderHtml};
use crate::filters::format_percent;
use crate::handlers::ViewParams;
use crate::models::{
    AreaChart, Domain, ListTable, Normalization, QueryMode, Scaling, ViewState, YearlySummary,
    ROOT_NAME,
};
use crate::services::analytics::yearly_summary;
use crate::services::dataset::Dataset;
use crate::services::drill_down::{current_data, QueryOutcome};
use crate::services::historical::historical;
use crate::services::presentation::{area_chart, list_table, treemap};
use crate::state::AppState;
use crate::VERSION;

/// One `<option>` of a filter select.
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }
}

/// A treemap cell with its links resolved.
pub struct CellView {
    pub name: String,
    pub key: String,
    pub value: f64,
    pub percent: String,
    pub color: &'static str,
    pub tooltip: String,
    pub navigate_href: String,
    pub history_href: String,
}

#[derive(Template)]
#[template(path = "pages/dashboard.html")]
pub struct DashboardTemplate {
    pub title: String,
    pub version: &'static str,
    pub heading: String,
    pub level: &'static str,
    pub agency: String,
    pub bureau: String,
    pub years: Vec<SelectOption>,
    pub domains: Vec<SelectOption>,
    pub scalings: Vec<SelectOption>,
    pub normalizations: Vec<SelectOption>,
    pub summary: YearlySummary,
    pub cells: Vec<CellView>,
    pub list: ListTable,
    pub fell_back_to_root: bool,
    pub reset_href: String,
    pub click_window_ms: u64,
}

#[derive(Template)]
#[template(path = "pages/history.html")]
pub struct HistoryTemplate {
    pub title: String,
    pub version: &'static str,
    pub path: Vec<String>,
    pub domain_label: &'static str,
    pub chart: AreaChart,
    pub back_href: String,
}

pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> AppResult<Html<String>> {
    let view = params.to_state()?;
    let dataset = state.dataset()?;
    debug!(level = view.level.as_str(), year = view.year, "Loading dashboard");

    let outcome = current_data(view, &dataset, None, QueryMode::Refresh)?;
    render_dashboard(&state, &dataset, outcome)
}

/// Drills into the clicked cell and renders the resulting level.
pub async fn navigate(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> AppResult<Html<String>> {
    let view = params.to_state()?;
    let item = params.require_item()?;
    let dataset = state.dataset()?;
    debug!(item, from = view.level.as_str(), "Navigating");

    let outcome = current_data(view, &dataset, Some(item), QueryMode::Advance)?;
    render_dashboard(&state, &dataset, outcome)
}

pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> AppResult<Html<String>> {
    let view = params.to_state()?;
    let item = params.require_item()?;
    let dataset = state.dataset()?;

    let target = view.history_target(item);
    let points = historical(dataset.ledger_for(&view), &target, dataset.years())?;
    let chart = area_chart(target.title(), &points, view.normalization);

    debug!(title = target.title(), points = points.len(), "History loaded");

    let path = std::iter::once(target.agency.clone())
        .chain(target.bureau.clone())
        .chain(target.account.clone())
        .collect();

    let template = HistoryTemplate {
        title: format!("Historie: {}", target.title()),
        version: VERSION,
        path,
        domain_label: view.domain.label(),
        chart,
        back_href: format!("/?{}", ViewParams::from_state(&view).query_string()),
    };

    template.render_html()
}

fn render_dashboard(
    state: &AppState,
    dataset: &Dataset,
    outcome: QueryOutcome,
) -> AppResult<Html<String>> {
    let QueryOutcome {
        state: view,
        tree,
        fell_back_to_root,
    } = outcome;

    let params = ViewParams::from_state(&view);
    let cells = treemap(&tree, &view)
        .cells
        .into_iter()
        .map(|cell| CellView {
            navigate_href: format!(
                "/navigate?{}",
                params.clone().with_item(&cell.name).query_string()
            ),
            history_href: format!(
                "/history?{}",
                params.clone().with_item(&cell.name).query_string()
            ),
            percent: format_percent(cell.percent_of_parent),
            name: cell.name,
            key: cell.key,
            value: cell.value,
            color: cell.color,
            tooltip: cell.tooltip,
        })
        .collect();

    let template = DashboardTemplate {
        title: format!("{} {}", view.domain.label(), view.year),
        version: VERSION,
        heading: view.level_name().unwrap_or(ROOT_NAME).to_string(),
        level: view.level.as_str(),
        agency: view.selected_agency().unwrap_or_default().to_string(),
        bureau: view.selected_bureau().unwrap_or_default().to_string(),
        years: year_options(dataset, &view),
        domains: Domain::all()
            .iter()
            .map(|d| SelectOption::new(d.as_str(), d.label(), *d == view.domain))
            .collect(),
        scalings: Scaling::all()
            .iter()
            .map(|s| SelectOption::new(s.as_str(), s.label(), *s == view.scaling))
            .collect(),
        normalizations: Normalization::all()
            .iter()
            .map(|n| SelectOption::new(n.as_str(), n.label(), *n == view.normalization))
            .collect(),
        summary: yearly_summary(dataset, &view),
        cells,
        list: list_table(&tree, view.normalization),
        fell_back_to_root,
        reset_href: format!(
            "/?{}",
            ViewParams::from_state(&view.clone().at_root_level()).query_string()
        ),
        click_window_ms: state.click_window_millis(),
    };

    template.render_html()
}

fn year_options(dataset: &Dataset, view: &ViewState) -> Vec<SelectOption> {
    supported_years()
        .filter(|y| dataset.years().contains(y))
        .map(|y| SelectOption::new(y.to_string(), y.to_string(), y == view.year))
        .collect()
}
