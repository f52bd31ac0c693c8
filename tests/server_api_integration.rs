//! End-to-end HTTP integration tests driving the real router (stub embedding mode,
//! a small on-disk catalog fixture, tempdir-backed audit logs).

use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use server::{build_router, ServerConfig, ServerState};

fn write_fixture_catalog(dir: &std::path::Path) -> String {
    let path = dir.join("catalog.json");
    let records = json!([
        {
            "code": "7212.0100",
            "title": "Welder, Gas",
            "description": "Joins metal parts using gas welding equipment.",
            "synonyms": ["gas welder"],
            "examples": ["pipe welder"],
            "hierarchy": {
                "division_code": "7",
                "division_name": "Craft and Related Trades Workers",
                "sub_division_code": "72",
                "minor_group_code": "721",
                "unit_group_code": "7212"
            }
        },
        {
            "code": "2330.0100",
            "title": "Teacher, Primary School",
            "description": "Teaches young children in a primary school.",
            "synonyms": ["shikshak"],
            "examples": ["classroom teacher"],
            "hierarchy": {
                "division_code": "2",
                "division_name": "Professionals",
                "sub_division_code": "23",
                "minor_group_code": "233",
                "unit_group_code": "2330"
            }
        }
    ]);
    std::fs::write(&path, serde_json::to_vec(&records).unwrap()).unwrap();
    path.to_string_lossy().to_string()
}

async fn test_state(admin_token: Option<&str>, search_limit: u32, admin_limit: u32) -> Arc<ServerState> {
    let catalog_dir = tempfile::tempdir().unwrap();
    let audit_dir = tempfile::tempdir().unwrap();
    let catalog_path = write_fixture_catalog(catalog_dir.path());

    let config = ServerConfig {
        catalog_path,
        embed_mode: "stub".to_string(),
        audit_dir: audit_dir.path().to_string_lossy().to_string(),
        admin_token: admin_token.map(str::to_string),
        rate_limit_search_per_minute: search_limit,
        rate_limit_admin_per_minute: admin_limit,
        ..ServerConfig::default()
    };

    // Leak the tempdirs for the test's lifetime rather than threading their drop
    // guards through every call site.
    std::mem::forget(catalog_dir);
    std::mem::forget(audit_dir);

    Arc::new(ServerState::new(config).await.expect("state init"))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn search_returns_a_confident_match_for_an_exact_title() {
    let state = test_state(None, 1000, 1000).await;
    let app = build_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/search")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "query": "Welder, Gas" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let results = body["results"].as_array().unwrap();
    assert!(!results.is_empty());
    assert_eq!(results[0]["code"], "7212.0100");
}

#[tokio::test]
async fn search_rejects_an_empty_query() {
    let state = test_state(None, 1000, 1000).await;
    let app = build_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/search")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "query": "" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn occupation_lookup_finds_a_known_code_and_404s_on_unknown() {
    let state = test_state(None, 1000, 1000).await;
    let app = build_router(state);

    let found = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/occupation/7212.0100")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(found.status(), StatusCode::OK);

    let missing = app
        .oneshot(
            Request::builder()
                .uri("/occupation/9999.9999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn feedback_rejects_an_unknown_code() {
    let state = test_state(None, 1000, 1000).await;
    let app = build_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/feedback")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "query": "welder", "selected_code": "0000.0000", "results_helpful": true }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn feedback_accepts_a_known_code() {
    let state = test_state(None, 1000, 1000).await;
    let app = build_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/feedback")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "query": "welder",
                "selected_code": "7212.0100",
                "results_helpful": false,
                "comments": "not quite right"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn search_admission_rate_limits_after_the_configured_cap() {
    let state = test_state(None, 2, 1000).await;
    let app = build_router(state);

    let make_request = || {
        Request::builder()
            .method("POST")
            .uri("/search")
            .header("content-type", "application/json")
            .header("x-rate-key", "same-client")
            .body(Body::from(json!({ "query": "teacher" }).to_string()))
            .unwrap()
    };

    let first = app.clone().oneshot(make_request()).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let second = app.clone().oneshot(make_request()).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    let third = app.oneshot(make_request()).await.unwrap();
    assert_eq!(third.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn admin_routes_require_the_configured_token() {
    let state = test_state(Some("s3cr3t"), 1000, 1000).await;
    let app = build_router(state);

    let unauthorized = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

    let authorized = app
        .oneshot(
            Request::builder()
                .uri("/admin/stats")
                .header("x-admin-token", "s3cr3t")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(authorized.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_endpoints_are_open_when_no_token_is_configured() {
    let state = test_state(None, 1000, 1000).await;
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn reindex_publishes_a_fresh_snapshot_from_the_same_catalog_file() {
    let state = test_state(None, 1000, 1000).await;
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/reindex")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["vector_count"], 2);
}

#[tokio::test]
async fn update_synonyms_rewrites_the_catalog_file_and_flags_reindex_required() {
    let state = test_state(None, 1000, 1000).await;
    let catalog_path = state.config.catalog_path.clone();
    let app = build_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/admin/update-synonyms")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "add": { "7212.0100": ["soldering hand"] },
                "remove": { "2330.0100": ["shikshak"] }
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["updated_count"], 2);
    assert!(body["invalid_codes"].as_array().unwrap().is_empty());
    assert_eq!(body["requires_reindex"], true);

    let raw = std::fs::read_to_string(&catalog_path).unwrap();
    assert!(raw.contains("soldering hand"));
    assert!(!raw.contains("shikshak"));
}

#[tokio::test]
async fn update_synonyms_reports_unknown_codes() {
    let state = test_state(None, 1000, 1000).await;
    let app = build_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/admin/update-synonyms")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "add": { "0000.0000": ["ghost"] }, "remove": {} }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["updated_count"], 0);
    assert_eq!(body["invalid_codes"][0], "0000.0000");
    assert_eq!(body["requires_reindex"], false);
}

#[tokio::test]
async fn health_and_readiness_report_ok() {
    let state = test_state(None, 1000, 1000).await;
    let app = build_router(state);

    let health = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    let ready = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(ready.status(), StatusCode::OK);
}
