//! Integration tests for the Axum web server.
//!
//! These tests drive the full router (middleware included) against a
//! temporary data directory.

use std::path::Path;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use romdl_axum::bootstrap::{ServerConfig, bootstrap};
use romdl_axum::routes::create_router;
use romdl_core::{RateLimitSpec, ResolvedPaths, Settings};

/// Refused immediately, so spawned transfers fail fast.
const DEAD_URL: &str = "http://127.0.0.1:9/a.zip";

fn write_catalog(root: &Path) {
    std::fs::write(
        root.join("systems.json"),
        r#"[{"platform":"nes","nom":"Nintendo NES","folder":"nes"}]"#,
    )
    .unwrap();
    std::fs::create_dir_all(root.join("games")).unwrap();
    std::fs::write(
        root.join("games/nes.json"),
        r#"[["Super Mario Bros","http://x/smb.zip",123456],["Zelda","http://x/zelda.zip"]]"#,
    )
    .unwrap();
}

fn test_app(settings: Settings) -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let paths = ResolvedPaths::from_data_root(dir.path().to_path_buf()).unwrap();
    let config = ServerConfig::new(paths, settings);
    let ctx = bootstrap(&config).unwrap();
    (dir, create_router(ctx, &config))
}

fn default_app() -> (TempDir, Router) {
    test_app(Settings::with_defaults())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn write_history(root: &Path, records: &Value) {
    std::fs::write(root.join("history.json"), records.to_string()).unwrap();
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let (_dir, app) = default_app();
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn submit_returns_task_and_history_record() {
    let (_dir, app) = default_app();
    let (status, body) = send(
        &app,
        post_json(
            "/api/download",
            &json!({"platform": "nes", "game_name": "A.zip", "url": DEAD_URL}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["task_id"].as_str().is_some_and(|s| !s.is_empty()));
    assert_eq!(body["history"]["status"], "downloading");
    assert_eq!(body["history"]["progress"], 0.0);
    assert_eq!(body["history"]["task_id"], body["task_id"]);
}

#[tokio::test]
async fn submit_without_url_is_bad_request() {
    let (_dir, app) = default_app();
    let (status, body) = send(
        &app,
        post_json("/api/download", &json!({"platform": "nes", "game_name": "A"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("url"));
}

#[tokio::test]
async fn mistyped_or_broken_body_is_json_bad_request() {
    let (_dir, app) = default_app();
    let (status, body) = send(
        &app,
        post_json("/api/download", &json!({"platform": "nes", "game_name": "A", "url": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));

    let broken = Request::builder()
        .method(Method::POST)
        .uri("/api/cancel")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, broken).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn batch_with_one_malformed_entry_preserves_order() {
    let (_dir, app) = default_app();
    let (status, body) = send(
        &app,
        post_json(
            "/api/downloads/batch",
            &json!({"downloads": [
                {"platform": "nes", "game_name": "A.zip", "url": DEAD_URL},
                {"platform": "nes", "game_name": "B.zip"},
                {"platform": "nes", "name": "C.zip", "url": "http://127.0.0.1:9/c.zip"},
            ]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 3);
    assert!(tasks[0]["task_id"].is_string());
    assert!(tasks[1]["error"].as_str().unwrap().contains("url"));
    assert_eq!(tasks[2]["history"]["game_name"], "C.zip");
}

#[tokio::test]
async fn batch_entry_of_wrong_type_fails_in_place() {
    let (_dir, app) = default_app();
    let (_, body) = send(
        &app,
        post_json(
            "/api/downloads/batch",
            &json!({"downloads": [42, {"platform": "nes", "game_name": "A.zip", "url": DEAD_URL}]}),
        ),
    )
    .await;
    let tasks = body["tasks"].as_array().unwrap();
    assert!(tasks[0]["error"].is_string());
    assert!(tasks[1]["task_id"].is_string());
}

#[tokio::test]
async fn cancel_requires_an_identifier() {
    let (_dir, app) = default_app();
    let (status, _) = send(&app, post_json("/api/cancel", &json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        post_json("/api/cancel", &json!({"url": "http://x/unknown.zip"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["state"], "not_running");
}

#[tokio::test]
async fn task_state_is_observable_after_submit() {
    let (_dir, app) = default_app();
    let (_, submitted) = send(
        &app,
        post_json(
            "/api/download",
            &json!({"platform": "nes", "game_name": "A.zip", "url": DEAD_URL}),
        ),
    )
    .await;
    let id = submitted["task_id"].as_str().unwrap();
    let (status, body) = send(&app, get(&format!("/api/tasks/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task_id"], id);
    assert_eq!(body["strategy"], "direct");

    let (status, _) = send(&app, get("/api/tasks/does-not-exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn redownload_resubmits_latest_entry() {
    let (dir, app) = default_app();
    write_history(
        dir.path(),
        &json!([{"platform": "nes", "game_name": "A.zip", "url": DEAD_URL, "status": "Erreur", "task_id": "old"}]),
    );
    let (status, body) = send(
        &app,
        post_json("/api/history/redownload", &json!({"url": DEAD_URL})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history"]["platform"], "nes");
    assert_eq!(body["history"]["game_name"], "A.zip");
    assert_ne!(body["task_id"], "old");

    let (status, _) = send(
        &app,
        post_json("/api/history/redownload", &json!({"url": "http://x/none.zip"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn progress_for_unknown_url_is_unknown() {
    let (_dir, app) = default_app();
    let (status, body) = send(&app, get("/api/progress?url=http%3A%2F%2Fx%2Fnone.zip")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "http://x/none.zip");
    assert_eq!(body["status"], "unknown");
    assert_eq!(body["percent"], 0);
}

#[tokio::test]
async fn progress_reconciles_file_presence() {
    let (dir, app) = default_app();
    write_history(
        dir.path(),
        &json!([{"platform": "nes", "name": "Mario.zip", "url": "http://x/mario.zip",
                 "status": "Téléchargement", "downloaded_size": 10, "total_size": 40}]),
    );
    let folder = dir.path().join("roms/nes");
    std::fs::create_dir_all(&folder).unwrap();
    std::fs::write(folder.join("Mario.zip"), b"rom").unwrap();

    let (_, body) = send(&app, get("/api/progress?url=http://x/mario.zip")).await;
    assert_eq!(body["status"], "completed");
    assert_eq!(body["percent"], 100);
    assert_eq!(body["game_name"], "Mario.zip");

    let (_, history) = send(&app, get("/api/history")).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["status"], "Download_OK");
}

#[tokio::test]
async fn progress_without_url_lists_recent() {
    let (dir, app) = default_app();
    let records: Vec<Value> = (0..12)
        .map(|i| json!({"platform": "nes", "game_name": format!("{i}"), "url": format!("http://x/{i}"), "status": "downloading"}))
        .collect();
    write_history(dir.path(), &Value::Array(records));
    let (_, body) = send(&app, get("/api/progress")).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 10);
    assert_eq!(list[9]["url"], "http://x/11");
}

#[tokio::test]
async fn history_filter_matches_raw_variants() {
    let (dir, app) = default_app();
    write_history(
        dir.path(),
        &json!([
            {"url": "http://x/1", "status": "Download_OK"},
            {"url": "http://x/2", "status": "Erreur"},
            {"url": "http://x/3", "status": "done"},
        ]),
    );
    let (_, body) = send(&app, get("/api/history?status=completed")).await;
    let urls: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["url"].as_str().unwrap())
        .collect();
    assert_eq!(urls, ["http://x/1", "http://x/3"]);

    let (_, body) = send(&app, get("/api/history?limit=1")).await;
    assert_eq!(body[0]["url"], "http://x/3");
}

#[tokio::test]
async fn search_finds_game_by_name() {
    let (_dir, app) = default_app();
    let (status, body) = send(&app, get("/api/search?q=mario")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"platform": "nes", "name": "Super Mario Bros", "url": "http://x/smb.zip", "size": 123456}])
    );
}

#[tokio::test]
async fn platform_games_flag_completed_urls() {
    let (dir, app) = default_app();
    write_history(
        dir.path(),
        &json!([{"url": "http://x/zelda.zip", "status": "Download_OK"}]),
    );
    let (_, platforms) = send(&app, get("/api/platforms")).await;
    assert_eq!(platforms[0]["id"], "nes");
    assert_eq!(platforms[0]["name"], "Nintendo NES");

    let (status, games) = send(&app, get("/api/platforms/nes/games")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(games[0]["completed"], false);
    assert_eq!(games[1]["completed"], true);

    let (status, _) = send(&app, get("/api/platforms/snes/games")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn gated_key_is_never_echoed() {
    let (_dir, app) = default_app();
    let (_, body) = send(&app, get("/api/settings/gated-key")).await;
    assert_eq!(body, json!({"present": false, "length": 0}));

    let (_, body) = send(
        &app,
        post_json("/api/settings/gated-key", &json!({"api_key": " secret "})),
    )
    .await;
    assert_eq!(body, json!({"ok": true, "present": true}));

    let (_, body) = send(&app, get("/api/settings/gated-key")).await;
    assert_eq!(body, json!({"present": true, "length": 6}));
}

#[tokio::test]
async fn status_reports_catalog_presence() {
    let (dir, app) = default_app();
    let (_, body) = send(&app, get("/api/status")).await;
    assert_eq!(body["sources"], true);
    assert_eq!(body["games_dir"], true);
    assert_eq!(body["data_dir"], dir.path().display().to_string());
}

#[tokio::test]
async fn api_key_is_required_when_configured() {
    let settings = Settings {
        api_key: Some("s3cret".into()),
        ..Settings::with_defaults()
    };
    let (_dir, app) = test_app(settings);

    let (status, body) = send(&app, get("/api/status")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);

    let with_header = Request::builder()
        .uri("/api/status")
        .header("X-Api-Key", "s3cret")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, with_header).await.0, StatusCode::OK);

    let with_bearer = Request::builder()
        .uri("/api/status")
        .header(header::AUTHORIZATION, "Bearer s3cret")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, with_bearer).await.0, StatusCode::OK);

    assert_eq!(send(&app, get("/api/status?api_key=s3cret")).await.0, StatusCode::OK);
    assert_eq!(send(&app, get("/api/status?api_key=nope")).await.0, StatusCode::UNAUTHORIZED);

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn rate_limit_denies_after_budget() {
    let settings = Settings {
        rate_limit: RateLimitSpec::new(2, 60),
        ..Settings::with_defaults()
    };
    let (_dir, app) = test_app(settings);
    assert_eq!(send(&app, get("/api/status")).await.0, StatusCode::OK);
    assert_eq!(send(&app, get("/api/status")).await.0, StatusCode::OK);
    let (status, body) = send(&app, get("/api/status")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["status"], 429);
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let (_dir, app) = default_app();
    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/download")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(preflight).await.unwrap();
    assert!(response.status().is_success());
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}
