pub mod api;
pub mod dashboard;

use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::date_utils::is_supported_year;
use crate::error::{AppError, AppResult};
use crate::form_utils::{deserialize_optional_i32, deserialize_optional_string};
use crate::models::{Domain, Level, Normalization, Scaling, ViewState};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Pages
        .route("/", get(dashboard::index))
        .route("/navigate", get(dashboard::navigate))
        .route("/history", get(dashboard::history))
        // API (JSON)
        .route("/api/view", get(api::view))
        .route("/api/navigate", post(api::navigate))
        .route("/api/reset", post(api::reset))
        .route("/api/history", get(api::history))
        .route("/api/status", get(api::status))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}

/// View state as carried in query strings, plus the clicked item for
/// navigation and history requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewParams {
    #[serde(
        default,
        deserialize_with = "deserialize_optional_i32",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<i32>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub domain: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub scaling: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub normalization: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub agency: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub bureau: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub item: Option<String>,
}

impl ViewParams {
    pub fn from_state(state: &ViewState) -> Self {
        Self {
            year: Some(state.year),
            domain: Some(state.domain.as_str().to_string()),
            scaling: Some(state.scaling.as_str().to_string()),
            normalization: Some(state.normalization.as_str().to_string()),
            agency: state.selected_agency().map(str::to_string),
            bureau: state.selected_bureau().map(str::to_string),
            item: None,
        }
    }

    pub fn with_item(self, item: &str) -> Self {
        Self {
            item: Some(item.to_string()),
            ..self
        }
    }

    /// Parses the parameters into a view state; absent fields take the
    /// initial state's values.
    pub fn to_state(&self) -> AppResult<ViewState> {
        let defaults = ViewState::default();

        let year = self.year.unwrap_or(defaults.year);
        if !is_supported_year(year) {
            return Err(AppError::Validation(format!("Unsupported year {}", year)));
        }
        let domain = parse_field(self.domain.as_deref(), "domain", Domain::parse)?
            .unwrap_or(defaults.domain);
        let scaling = parse_field(self.scaling.as_deref(), "scaling", Scaling::parse)?
            .unwrap_or(defaults.scaling);
        let normalization = parse_field(
            self.normalization.as_deref(),
            "normalization",
            Normalization::parse,
        )?
        .unwrap_or(defaults.normalization);

        let level = match (&self.agency, &self.bureau) {
            (None, None) => Level::Root,
            (Some(agency), None) => Level::Agency {
                agency: agency.clone(),
            },
            (Some(agency), Some(bureau)) => Level::Bureau {
                agency: agency.clone(),
                bureau: bureau.clone(),
            },
            (None, Some(_)) => {
                return Err(AppError::Validation(
                    "A bureau requires its agency".into(),
                ))
            }
        };

        Ok(ViewState {
            year,
            domain,
            scaling,
            normalization,
            level,
            last_drilled: None,
        })
    }

    pub fn require_item(&self) -> AppResult<&str> {
        self.item
            .as_deref()
            .ok_or_else(|| AppError::Validation("Missing item".into()))
    }

    /// URL query string for links back into the dashboard.
    pub fn query_string(&self) -> String {
        serde_urlencoded::to_string(self).unwrap_or_default()
    }
}

fn parse_field<T>(
    value: Option<&str>,
    field: &str,
    parse: fn(&str) -> Option<T>,
) -> AppResult<Option<T>> {
    match value {
        None => Ok(None),
        Some(v) => parse(v)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Unknown {} '{}'", field, v))),
    }
}
