//! HTTP surface: status codes and bodies through the real router.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use courtvision::api;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::{Pool, Sqlite};
use tower::ServiceExt;

fn app(pool: &Pool<Sqlite>) -> Router {
    api::router(common::state(pool))
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// A complete stat line; every counter is required on the wire.
fn stat_line(player_id: i64, points: i64) -> Value {
    json!({
        "playerID": player_id,
        "minutes": 24,
        "points": points,
        "rebounds": 4,
        "assists": 3,
        "steals": 1,
        "blocks": 0,
        "turnovers": 2,
        "fouls": 1,
        "three_pt": 1
    })
}

fn with_game(mut line: Value, game_id: i64) -> Value {
    line["gameID"] = json!(game_id);
    line
}

#[tokio::test]
async fn aggregate_with_filters() {
    let pool = common::seeded_pool().await;

    let (status, body) = send(
        app(&pool),
        get("/players/stats/aggregate?position=Guard&min_points=15"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["playerID"], 1);
}

#[tokio::test]
async fn empty_result_is_ok() {
    let pool = common::seeded_pool().await;

    let (status, body) = send(app(&pool), get("/players/4/stats/filtered")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn unknown_filter_is_bad_request() {
    let pool = common::seeded_pool().await;

    let (status, body) = send(app(&pool), get("/analytics/datasets?orderBy=points")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_filter");
    assert!(body["error"].as_str().unwrap().contains("orderBy"));
}

#[tokio::test]
async fn bad_filter_value_is_unprocessable() {
    let pool = common::seeded_pool().await;

    let (status, body) = send(
        app(&pool),
        get("/analytics/competition-context/1?min_games=three"),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "invalid_filter_value");
}

#[tokio::test]
async fn storage_failure_is_server_error() {
    let pool = common::seeded_pool().await;
    pool.close().await;

    let (status, body) = send(app(&pool), get("/analytics/datasets")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "storage");
}

#[tokio::test]
async fn create_game_returns_ids() {
    let pool = common::seeded_pool().await;

    let (status, body) = send(
        app(&pool),
        post(
            "/games",
            json!({
                "date": "2024-02-15",
                "opponent": "Villanova",
                "startTime": "18:30:00",
                "stats": [stat_line(1, 21), stat_line(3, 6)]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["gameID"], 4);
    assert_eq!(body["statIDs"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn create_game_with_unknown_player() {
    let pool = common::seeded_pool().await;

    let (status, body) = send(
        app(&pool),
        post(
            "/games",
            json!({
                "date": "2024-02-15",
                "opponent": "Villanova",
                "stats": [stat_line(404, 3)]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
    assert_eq!(common::count(&pool, "SELECT COUNT(*) FROM Game").await, 3);
}

#[tokio::test]
async fn negative_stat_is_rejected() {
    let pool = common::seeded_pool().await;

    let (status, body) = send(
        app(&pool),
        post(
            "/players/stats",
            with_game(stat_line(4, -2), 1),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "invalid_payload");
}

#[tokio::test]
async fn add_stats_to_existing_game() {
    let pool = common::seeded_pool().await;

    let (status, body) = send(
        app(&pool),
        post(
            "/players/stats",
            with_game(stat_line(4, 4), 3),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["statID"], 8);
}

#[tokio::test]
async fn live_annotation() {
    let pool = common::seeded_pool().await;

    let (status, body) = send(
        app(&pool),
        post(
            "/scouts/1/annotations",
            json!({ "playerID": 2, "text": "Pushes pace in transition", "timestamp": "00:05:10" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["reportID"], 2);
    assert!(body["annotationID"].as_i64().is_some());
}

#[tokio::test]
async fn truncated_stat_line_is_rejected() {
    let pool = common::seeded_pool().await;

    let (status, body) = send(
        app(&pool),
        post("/players/stats", json!({ "gameID": 1, "playerID": 4 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "invalid_payload");
    assert!(body["error"].as_str().unwrap().contains("minutes"));
    assert_eq!(common::count(&pool, "SELECT COUNT(*) FROM Game_Stats").await, 7);
}

#[tokio::test]
async fn malformed_body_gets_an_error_body() {
    let pool = common::seeded_pool().await;

    let (status, body) = send(
        app(&pool),
        post("/games", json!({ "date": "not-a-date", "opponent": "Duke" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "invalid_payload");
    assert!(body["error"].as_str().unwrap().contains("date"));

    let not_json = Request::builder()
        .method("POST")
        .uri("/games")
        .header("content-type", "application/json")
        .body(Body::from("{ opponent: Duke"))
        .unwrap();
    let (status, body) = send(app(&pool), not_json).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "invalid_payload");

    let (status, body) = send(
        app(&pool),
        post("/scouts/1/annotations", json!({ "playerID": "two", "text": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "invalid_payload");
}

#[tokio::test]
async fn malformed_start_time_writes_nothing() {
    let pool = common::seeded_pool().await;

    let (status, body) = send(
        app(&pool),
        post(
            "/games",
            json!({ "date": "2024-02-15", "opponent": "Duke", "startTime": "7pm", "stats": [] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "invalid_payload");
    assert_eq!(common::count(&pool, "SELECT COUNT(*) FROM Game").await, 3);
}

#[tokio::test]
async fn non_numeric_path_id() {
    let pool = common::seeded_pool().await;

    let (status, body) = send(app(&pool), get("/players/abc/stats/filtered")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "invalid_filter_value");
    assert!(body["error"].as_str().unwrap().contains("abc"));

    let (status, body) = send(app(&pool), get("/analytics/competition-context/abc")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "invalid_filter_value");

    let (status, body) = send(
        app(&pool),
        post("/scouts/abc/annotations", json!({ "playerID": 1, "text": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "invalid_payload");
}
