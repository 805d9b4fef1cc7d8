//! Shared test utilities for integration tests.
//!
//! `TestClient` drives the router in-process against a dataset parsed from
//! the small CSV fixtures below.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use budgetmap::config::Config;
use budgetmap::handlers;
use budgetmap::server;
use budgetmap::services::dataset::Dataset;
use budgetmap::state::AppState;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Expense fixture, amounts in thousands of euros.
///
/// - `Onderwijs & Wetenschap` is empty in 2015 (empty cell reads as zero).
/// - `Zorg / Preventie` is zero in 2014.
/// - `Kapotte Post` has an unparseable amount and is skipped.
pub const EXPENSES_CSV: &str = "\
Agency Name,Bureau Name,Account Name,Unique,2012,2013,2014,2015
Zorg,Ziekenhuizen,Ziekenhuiszorg,zorg-zh-1,\"40,000,000\",\"42,000,000\",\"43,000,000\",\"44,000,000\"
Zorg,Preventie,Vaccinaties,zorg-pr-1,\"1,000,000\",\"1,100,000\",0,\"1,200,000\"
Defensie,Materieel,Fregatten,def-mat-1,\"5,000,000\",\"5,500,000\",\"6,000,000\",\"6,500,000\"
Defensie,Personeel,Salarissen,def-per-1,\"3,000,000\",\"3,000,000\",\"3,000,000\",\"3,000,000\"
Onderwijs,Scholen,Basisonderwijs,ow-sch-1,\"10,000,000\",\"10,000,000\",\"10,500,000\",\"11,000,000\"
Onderwijs,Scholen,Voortgezet onderwijs,ow-sch-2,\"8,000,000\",\"8,200,000\",\"8,400,000\",\"8,600,000\"
Onderwijs & Wetenschap,Onderzoek,NWO,ows-1,\"900,000\",\"950,000\",\"1,000,000\",
Kapotte Post,X,Y,kp-1,abc,1,1,1
";

pub const INCOME_CSV: &str = "\
Agency Name,Bureau Name,Account Name,Unique,2012,2013,2014,2015
Belastingen,Inkomstenbelasting,IB,bel-ib,\"50,000,000\",\"52,000,000\",\"54,000,000\",\"56,000,000\"
Belastingen,BTW,BTW,bel-btw,\"45,000,000\",\"46,000,000\",\"47,000,000\",\"48,000,000\"
Aardgas,Baten,Gasbaten,gas-1,\"10,000,000\",\"9,000,000\",\"8,000,000\",\"7,000,000\"
";

pub fn fixture_dataset() -> Dataset {
    Dataset::from_csv(EXPENSES_CSV.as_bytes(), INCOME_CSV.as_bytes())
        .expect("fixture CSVs should load")
}

pub struct TestClient {
    state: AppState,
}

impl TestClient {
    /// A client whose dataset is already loaded.
    pub fn new() -> Self {
        Self {
            state: AppState::ready(Config::default(), fixture_dataset()),
        }
    }

    /// A client whose dataset has not been published yet.
    pub fn not_ready() -> Self {
        Self {
            state: AppState::new(Config::default()),
        }
    }

    /// A client over an existing state, e.g. one a loader ran against.
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Routes only, without the error page middleware.
    pub fn router(&self) -> Router {
        handlers::routes().with_state(self.state.clone())
    }

    /// The production middleware stack.
    pub fn full_router(&self) -> Router {
        server::router(self.state.clone())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        Self::send(
            self.router(),
            Request::builder().uri(uri).body(Body::empty()).unwrap(),
        )
        .await
    }

    /// GET through the full middleware stack.
    pub async fn get_page(&self, uri: &str) -> (StatusCode, String) {
        Self::send(
            self.full_router(),
            Request::builder().uri(uri).body(Body::empty()).unwrap(),
        )
        .await
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.get(uri).await;
        (status, serde_json::from_str(&body).unwrap_or_default())
    }

    pub async fn post_json(
        &self,
        uri: &str,
        payload: &serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();
        let (status, body) = Self::send(self.router(), request).await;
        (status, serde_json::from_str(&body).unwrap_or_default())
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }
}

/// Names of the children in a JSON aggregate node.
pub fn child_names(node: &serde_json::Value) -> Vec<String> {
    node["children"]
        .as_array()
        .map(|children| {
            children
                .iter()
                .filter_map(|c| c["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
