//! Integration tests for the server-rendered pages.

mod common;

use axum::http::StatusCode;
use common::TestClient;

#[tokio::test]
async fn test_dashboard_root() {
    let client = TestClient::new();
    let (status, body) = client.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(">rijksbegroting</h1>"));
    assert!(body.contains("data-level=\"root\""));
    assert!(body.contains("data-click-window=\"300\""));
    assert!(body.contains("\u{20ac}74 miljard"));
    assert!(body.contains("Bedrag (miljarden)"));
    assert!(body.contains("year=2015&amp;domain=expenses&amp;scaling=raw"));
    assert!(!body.contains("fallback-notice"));
}

#[tokio::test]
async fn test_dashboard_escapes_names() {
    let client = TestClient::new();
    let (status, body) = client.get("/?year=2014").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Onderwijs &amp; Wetenschap"));
}

#[tokio::test]
async fn test_dashboard_marks_selected_filters() {
    let client = TestClient::new();
    let (status, body) = client
        .get("/?year=2013&domain=income&normalization=absolute")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<option value=\"2013\" selected>"));
    assert!(body.contains("<option value=\"income\" selected>"));
    assert!(body.contains("<option value=\"absolute\" selected>"));
    assert!(body.contains(">Belastingen<"));
}

#[tokio::test]
async fn test_navigate_page_drills_into_agency() {
    let client = TestClient::new();
    let (status, body) = client.get("/navigate?item=Zorg").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(">Zorg</h1>"));
    assert!(body.contains("data-level=\"agency\""));
    assert!(body.contains("Ziekenhuizen"));
    assert!(body.contains("Terug naar de hele begroting"));
    assert!(body.contains("name=\"agency\" value=\"Zorg\""));
}

#[tokio::test]
async fn test_navigate_page_falls_back() {
    let client = TestClient::new();
    let (status, body) = client
        .get("/navigate?year=2014&agency=Zorg&item=Preventie")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("fallback-notice"));
    assert!(body.contains("data-level=\"root\""));
}

#[tokio::test]
async fn test_navigate_page_requires_item() {
    let client = TestClient::new();
    let (status, _) = client.get("/navigate").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_page() {
    let client = TestClient::new();
    let (status, body) = client.get("/history?item=Zorg").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Historie: Zorg"));
    assert!(body.contains("2013 - \u{20ac}43,10 miljard"));
    assert!(body.contains("miljarden (\u{20ac})"));
    assert!(body.contains("Terug naar Uitgaven"));
}

#[tokio::test]
async fn test_history_page_account_path() {
    let client = TestClient::new();
    let (status, body) = client
        .get("/history?agency=Defensie&bureau=Materieel&item=Fregatten&normalization=per_capita")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Defensie &rsaquo; Materieel &rsaquo; Fregatten"));
    assert!(body.contains("per persoon (\u{20ac})"));
}

#[tokio::test]
async fn test_unknown_route_renders_error_page() {
    let client = TestClient::new();
    let (status, body) = client.get_page("/begroting/onbekend").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("404 Niet gevonden"));
}

#[tokio::test]
async fn test_page_before_load_renders_unavailable() {
    let client = TestClient::not_ready();
    let (status, body) = client.get_page("/").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.contains("503 Nog niet beschikbaar"));
}

#[tokio::test]
async fn test_api_errors_keep_their_body() {
    let client = TestClient::not_ready();
    let (status, body) = client.get_page("/api/view").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(!body.contains("Nog niet beschikbaar"));
    assert!(body.contains("Budget data is still loading"));
}

#[tokio::test]
async fn test_invalid_view_renders_bad_request() {
    let client = TestClient::new();
    let (status, body) = client.get_page("/?domain=belasting").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Unknown domain"));
}
