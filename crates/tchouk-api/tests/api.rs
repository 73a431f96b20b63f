//! End-to-end tests over the full router with the in-memory backend.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use tchouk_api::auth::{AppState, AppStateInner, hash_password, issue_token};
use tchouk_store::Store;
use tchouk_types::models::UserRecord;

fn test_state() -> AppState {
    Arc::new(AppStateInner {
        store: Store::in_memory(),
        jwt_secret: "test-secret".into(),
    })
}

fn app(state: &AppState) -> Router {
    tchouk_api::router(state.clone())
}

fn scorer_cookie(state: &AppState) -> String {
    format!(
        "auth_token={}",
        issue_token(&state.jwt_secret, "scorer").unwrap()
    )
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn seed_user(state: &AppState, username: &str, password: &str) {
    let hash = hash_password(password).unwrap();
    state
        .store
        .insert(UserRecord::new(username, hash))
        .unwrap();
}

// -- Auth --

#[tokio::test]
async fn login_sets_the_auth_cookie() {
    let state = test_state();
    seed_user(&state, "admin", "secret1234");
    let app = app(&state);

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(&json!({"username": "admin", "password": "secret1234"})).unwrap(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("auth_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Max-Age=604800"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Logged in as: admin");

    // The issued cookie opens protected routes.
    let token = cookie.split(';').next().unwrap();
    let (status, _) = send(&app, "GET", "/matches", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let state = test_state();
    seed_user(&state, "admin", "secret1234");
    let app = app(&state);

    let (status, body) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({"username": "admin", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password");

    let (status, _) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({"username": "nobody", "password": "secret1234"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_the_cookie() {
    let state = test_state();
    let app = app(&state);

    let (status, body) = send(&app, "GET", "/matches", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "No token found");

    let (status, body) = send(
        &app,
        "GET",
        "/matches",
        Some("auth_token=not.a.jwt"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

// -- Matches --

#[tokio::test]
async fn match_create_cascades_three_thirds() {
    let state = test_state();
    let app = app(&state);
    let cookie = scorer_cookie(&state);

    let (status, body) = send(
        &app,
        "POST",
        "/matches",
        Some(&cookie),
        Some(json!({"name": "A", "players": ["Ann", "Ben"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let thirds = body["thirds"].as_object().unwrap();
    assert_eq!(thirds.len(), 3);
    let ids: Vec<&str> = ["first", "second", "third"]
        .iter()
        .map(|k| thirds[*k].as_str().unwrap())
        .collect();
    assert_ne!(ids[0], ids[1]);
    assert_ne!(ids[1], ids[2]);
    assert_ne!(ids[0], ids[2]);

    for (id, label) in ids.iter().zip(["First", "Second", "Third"]) {
        let (status, sheet) = send(
            &app,
            "GET",
            &format!("/spreadsheets/{id}"),
            Some(&cookie),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sheet["name"], format!("A - {label} Third"));
        let players = sheet["players"].as_array().unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0]["name"], "Ann");
        assert_eq!(players[0]["attacking"]["point"], 0);
    }
}

#[tokio::test]
async fn duplicate_match_name_creates_nothing() {
    let state = test_state();
    let app = app(&state);
    let cookie = scorer_cookie(&state);

    let (status, _) = send(
        &app,
        "POST",
        "/matches",
        Some(&cookie),
        Some(json!({"name": "Final"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/matches",
        Some(&cookie),
        Some(json!({"name": "Final"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Match name already used");

    // The rejected create must not have left extra spreadsheets behind.
    let (_, sheets) = send(&app, "GET", "/spreadsheets", Some(&cookie), None).await;
    assert_eq!(sheets.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn empty_match_name_is_rejected() {
    let state = test_state();
    let app = app(&state);
    let cookie = scorer_cookie(&state);

    let (status, _) = send(
        &app,
        "POST",
        "/matches",
        Some(&cookie),
        Some(json!({"name": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn match_rename_and_delete() {
    let state = test_state();
    let app = app(&state);
    let cookie = scorer_cookie(&state);

    let (_, created) = send(
        &app,
        "POST",
        "/matches",
        Some(&cookie),
        Some(json!({"name": "A"})),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/matches/{id}"),
        Some(&cookie),
        Some(json!({"name": "B"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "B");
    assert_eq!(updated["id"], id.as_str());

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/matches/{id}"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Deleting again reports the miss as a 404.
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/matches/{id}"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", &format!("/matches/{id}"), Some(&cookie), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_ids_are_rejected_up_front() {
    let state = test_state();
    let app = app(&state);
    let cookie = scorer_cookie(&state);

    let (status, _) = send(&app, "GET", "/matches/not-hex", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", "/spreadsheets/1234", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// -- Spreadsheets and player actions --

async fn create_sheet(app: &Router, cookie: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/spreadsheets",
        Some(cookie),
        Some(json!({"name": name})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn player_actions_route_and_clamp() {
    let state = test_state();
    let app = app(&state);
    let cookie = scorer_cookie(&state);
    let sheet_id = create_sheet(&app, &cookie, "S").await;

    let (status, sheet) = send(
        &app,
        "POST",
        &format!("/spreadsheets/{sheet_id}/players"),
        Some(&cookie),
        Some(json!({"name": "Ann"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sheet["players"][0]["name"], "Ann");

    let action_uri = format!("/spreadsheets/{sheet_id}/players/Ann/actions");

    let (status, player) = send(
        &app,
        "POST",
        &action_uri,
        Some(&cookie),
        Some(json!({"type": "point", "value": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(player["attacking"]["point"], 1);

    // An oversized undo clamps at zero instead of going negative.
    let (status, player) = send(
        &app,
        "POST",
        &action_uri,
        Some(&cookie),
        Some(json!({"type": "point", "value": -5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(player["attacking"]["point"], 0);

    let (_, player) = send(
        &app,
        "POST",
        &action_uri,
        Some(&cookie),
        Some(json!({"type": "1st", "value": 2})),
    )
    .await;
    assert_eq!(player["defending"]["first"], 2);

    // The mutation persisted through the aggregate rewrite.
    let (_, sheet) = send(
        &app,
        "GET",
        &format!("/spreadsheets/{sheet_id}"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(sheet["players"][0]["defending"]["first"], 2);
    assert_eq!(sheet["players"][0]["attacking"]["point"], 0);
}

#[tokio::test]
async fn unknown_action_type_is_rejected() {
    let state = test_state();
    let app = app(&state);
    let cookie = scorer_cookie(&state);
    let sheet_id = create_sheet(&app, &cookie, "S").await;

    send(
        &app,
        "POST",
        &format!("/spreadsheets/{sheet_id}/players"),
        Some(&cookie),
        Some(json!({"name": "Ann"})),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/spreadsheets/{sheet_id}/players/Ann/actions"),
        Some(&cookie),
        Some(json!({"type": "smash", "value": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "unknown action type 'smash'");
}

#[tokio::test]
async fn actions_against_missing_players_are_404s() {
    let state = test_state();
    let app = app(&state);
    let cookie = scorer_cookie(&state);
    let sheet_id = create_sheet(&app, &cookie, "S").await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/spreadsheets/{sheet_id}/players/Ghost/actions"),
        Some(&cookie),
        Some(json!({"type": "point", "value": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn players_are_unique_within_a_sheet() {
    let state = test_state();
    let app = app(&state);
    let cookie = scorer_cookie(&state);
    let sheet_id = create_sheet(&app, &cookie, "S").await;
    let players_uri = format!("/spreadsheets/{sheet_id}/players");

    send(&app, "POST", &players_uri, Some(&cookie), Some(json!({"name": "Ann"}))).await;
    let (status, body) = send(
        &app,
        "POST",
        &players_uri,
        Some(&cookie),
        Some(json!({"name": "Ann"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Player 'Ann' already exists");
}

#[tokio::test]
async fn remove_player_then_its_actions_miss() {
    let state = test_state();
    let app = app(&state);
    let cookie = scorer_cookie(&state);
    let sheet_id = create_sheet(&app, &cookie, "S").await;
    let players_uri = format!("/spreadsheets/{sheet_id}/players");

    send(&app, "POST", &players_uri, Some(&cookie), Some(json!({"name": "Ann"}))).await;

    let (status, sheet) = send(
        &app,
        "DELETE",
        &format!("{players_uri}/Ann"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(sheet["players"].as_array().unwrap().is_empty());

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("{players_uri}/Ann"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// -- Graphs (public variant) --

#[tokio::test]
async fn graphs_are_public_and_filterable() {
    let state = test_state();
    let app = app(&state);

    let (status, shots) = send(
        &app,
        "POST",
        "/graphs",
        None,
        Some(json!({"name": "Shots", "graphType": "bar", "datasource": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(shots["datasource"], "");
    let shots_id = shots["id"].as_str().unwrap().to_string();
    assert_eq!(shots_id.len(), 24);

    send(
        &app,
        "POST",
        "/graphs",
        None,
        Some(json!({"name": "Possession", "graphType": "pie"})),
    )
    .await;

    let (_, all) = send(&app, "GET", "/graphs", None, None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, bars) = send(&app, "GET", "/graphs?graphType=bar", None, None).await;
    let bars = bars.as_array().unwrap();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0]["name"], "Shots");

    // Point the pie graph at the bar graph's record as its data source.
    let pie_id = all
        .as_array()
        .unwrap()
        .iter()
        .find(|g| g["name"] == "Possession")
        .and_then(|g| g["id"].as_str())
        .unwrap()
        .to_string();
    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/graphs/{pie_id}"),
        None,
        Some(json!({"datasource": shots_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["datasource"], shots_id.as_str());

    let (status, _) = send(&app, "DELETE", &format!("/graphs/{pie_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &format!("/graphs/{pie_id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn graph_with_malformed_datasource_is_a_400() {
    let state = test_state();
    let app = app(&state);

    let (status, _) = send(
        &app,
        "POST",
        "/graphs",
        None,
        Some(json!({"name": "Shots", "graphType": "bar", "datasource": "zz"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// -- Webpages --

#[tokio::test]
async fn webpages_round_trip_behind_auth() {
    let state = test_state();
    let app = app(&state);
    let cookie = scorer_cookie(&state);

    let (status, _) = send(&app, "GET", "/webpages", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, page) = send(
        &app,
        "POST",
        "/webpages",
        Some(&cookie),
        Some(json!({
            "name": "Standings",
            "src": "https://example.org/standings",
            "size": {"width": 320.0, "height": 240.0},
            "position": {"x": 0.0, "y": 100.0}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = page["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/webpages/{id}"),
        Some(&cookie),
        Some(json!({"position": {"x": 50.0, "y": 60.0}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["position"]["x"], 50.0);
    assert_eq!(updated["size"]["width"], 320.0);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/webpages/{id}"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, pages) = send(&app, "GET", "/webpages", Some(&cookie), None).await;
    assert!(pages.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn webpage_requires_name_and_source() {
    let state = test_state();
    let app = app(&state);
    let cookie = scorer_cookie(&state);

    let (status, _) = send(
        &app,
        "POST",
        "/webpages",
        Some(&cookie),
        Some(json!({"name": "", "src": "https://example.org"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "POST",
        "/webpages",
        Some(&cookie),
        Some(json!({"name": "Standings", "src": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
