mod support;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use newslens_rs::gateway::Analyzer;
use newslens_rs::server::{build_router, AppState};
use newslens_rs::theme::Theme;
use newslens_rs::types::AnalysisRequest;
use serde_json::{json, Value};
use std::sync::Arc;
use support::{FakeAnalyzer, GatedAnalyzer};
use tower::ServiceExt; // for `oneshot`

fn app(analyzer: Arc<dyn Analyzer>) -> Router {
    build_router(AppState::new(analyzer, Theme::default()))
}

fn form(body: &str) -> Request<Body> {
    Request::post("/analyze")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

async fn text(resp: axum::response::Response) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn home_and_about_render() {
    let app = app(Arc::new(FakeAnalyzer::ok(json!({}))));

    let resp = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = text(resp).await;
    assert!(html.contains("Fact Verification"));
    assert!(html.contains("--primary: #00f2ff"));

    let resp = app.oneshot(get("/about")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(text(resp).await.contains("only asks and displays"));
}

#[tokio::test]
async fn content_tab_uses_textarea() {
    let app = app(Arc::new(FakeAnalyzer::ok(json!({}))));
    let html = text(app.oneshot(get("/analyze?mode=content")).await.unwrap()).await;
    assert!(html.contains("<textarea"));
    assert!(html.contains(r#"value="content""#));
}

#[tokio::test]
async fn submission_sends_one_field_and_renders_defaults() {
    let fake = Arc::new(FakeAnalyzer::ok(json!({"sourceReliability": 80, "bias": -70})));
    let app = app(fake.clone());

    let resp = app.oneshot(form("mode=title&text=Aliens+land+in+Ohio")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = text(resp).await;

    assert_eq!(fake.requests(), vec![AnalysisRequest {
        url: String::new(),
        title: "Aliens land in Ohio".into(),
        content: String::new(),
    }]);
    assert!(html.contains("Overall Score 20%"));
    assert!(html.contains("Left (-70)"));
    assert!(html.contains("Overall Tone NEUTRAL"));
    assert!(html.contains("No Social Media Data Available"));
    assert!(html.contains(">credibility</span>"));
    assert!(html.contains("Exercise Caution"));
}

#[tokio::test]
async fn failure_is_shown_inline() {
    let app = app(Arc::new(FakeAnalyzer::failing("Article could not be fetched")));
    let resp = app.oneshot(form("mode=url&text=https%3A%2F%2Fexample.com%2Fa")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = text(resp).await;
    assert!(html.contains(r#"<p class="error">Article could not be fetched</p>"#));
    assert!(!html.contains("Credibility Breakdown"));
}

#[tokio::test]
async fn empty_input_is_rejected_without_a_call() {
    let fake = Arc::new(FakeAnalyzer::ok(json!({})));
    let app = app(fake.clone());
    let resp = app.oneshot(form("mode=url&text=++")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(text(resp).await.contains("please enter a url to analyze"));
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn second_submission_while_loading_is_refused() {
    let gated = Arc::new(GatedAnalyzer::default());
    let app = app(gated.clone());

    let first = tokio::spawn(app.clone().oneshot(form("mode=url&text=https%3A%2F%2Fexample.com%2F1")));
    gated.started.notified().await;

    let resp = app.clone().oneshot(form("mode=title&text=Another")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert!(text(resp).await.contains("already in progress"));

    let html = text(app.clone().oneshot(get("/analyze?mode=content")).await.unwrap()).await;
    assert!(html.contains("disabled"));
    assert!(html.contains("Analyzing..."));
    assert!(!html.contains("<textarea"));

    gated.release.notify_one();
    let resp = first.await.unwrap().unwrap();
    assert!(text(resp).await.contains("Overall Score 23%"));
    assert_eq!(gated.calls(), 1);
}

#[tokio::test]
async fn dropped_submission_still_frees_the_session() {
    let gated = Arc::new(GatedAnalyzer::default());
    let app = app(gated.clone());

    let first = tokio::spawn(app.clone().oneshot(form("mode=url&text=https%3A%2F%2Fexample.com%2F1")));
    gated.started.notified().await;
    // the client goes away mid-request
    first.abort();
    assert!(first.await.unwrap_err().is_cancelled());
    gated.release.notify_one();

    let mut html = String::new();
    for _ in 0..1000 {
        html = text(app.clone().oneshot(get("/analyze")).await.unwrap()).await;
        if !html.contains("Analyzing...") {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(html.contains("Overall Score 23%"));

    // blank input is checked after the busy guard, so 422 means the session is free
    let resp = app.oneshot(form("mode=title&text=++")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(gated.calls(), 1);
}

#[tokio::test]
async fn detection_card_shows_readability_details() {
    let app = app(Arc::new(FakeAnalyzer::ok(json!({
        "readabilityMetrics": {"readabilityScore": 64, "averageWordLength": 4.7, "averageSentenceLength": 18.4}
    }))));
    let html = text(app.oneshot(form("mode=title&text=Budget+passes")).await.unwrap()).await;
    assert!(html.contains("Readability 64 (Advanced)"));
    assert!(html.contains("Avg word length 4.7"));
    assert!(html.contains("Avg sentence length 18.4"));
}

#[tokio::test]
async fn json_endpoint_returns_normalized_report() {
    let fake = Arc::new(FakeAnalyzer::ok(json!({"keyTerms": [], "sentiment": {"positive": 65, "neutral": 20, "tone": "hopeful"}})));
    let app = app(fake.clone());

    let req = Request::post("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"url": "", "title": "", "content": "Some article text"}).to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v: Value = serde_json::from_str(&text(resp).await).unwrap();
    assert_eq!(v["ok"], true);
    assert_eq!(v["data"]["summary"]["dominant_sentiment"], "positive");
    assert_eq!(v["data"]["report"]["sentiment"]["tone"], "hopeful");
    assert_eq!(v["data"]["report"]["key_terms"].as_array().unwrap().len(), 6);
    assert_eq!(fake.requests()[0].content, "Some article text");
}

#[tokio::test]
async fn json_endpoint_maps_service_errors() {
    let app = app(Arc::new(FakeAnalyzer::failing("Error analyzing news")));
    let req = Request::post("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"url": "https://example.com", "title": "", "content": ""}).to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let v: Value = serde_json::from_str(&text(resp).await).unwrap();
    assert_eq!(v, json!({"ok": false, "error": "Error analyzing news"}));
}

#[tokio::test]
async fn json_endpoint_skips_blank_fields() {
    let fake = Arc::new(FakeAnalyzer::ok(json!({})));
    let app = app(fake.clone());
    let req = Request::post("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"url": "  ", "title": "Real headline", "content": ""}).to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(fake.requests(), vec![AnalysisRequest {
        url: String::new(),
        title: "Real headline".into(),
        content: String::new(),
    }]);
}
