//! HTTP handlers for the tracker: thin translators between routes and the
//! storage engine. Route wiring lives here so the integration suite drives
//! exactly what the server binary serves.

pub mod auth;
pub mod error;
pub mod graphs;
pub mod matches;
pub mod middleware;
pub mod spreadsheets;
pub mod webpages;

use axum::Router;
use axum::routing::{delete, get, post};

use crate::auth::AppState;

/// Full application router: login and graphs are public (graphs run as a
/// separate unauthenticated deployment), everything else sits behind the
/// cookie-JWT gate.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/login", post(auth::login))
        .route("/graphs", get(graphs::list).post(graphs::create))
        .route(
            "/graphs/{id}",
            get(graphs::get).put(graphs::update).delete(graphs::remove),
        )
        .with_state(state.clone());

    let protected = Router::new()
        .route(
            "/spreadsheets",
            get(spreadsheets::list).post(spreadsheets::create),
        )
        .route(
            "/spreadsheets/{id}",
            get(spreadsheets::get)
                .put(spreadsheets::update)
                .delete(spreadsheets::remove),
        )
        .route("/spreadsheets/{id}/players", post(spreadsheets::add_player))
        .route(
            "/spreadsheets/{id}/players/{name}",
            delete(spreadsheets::remove_player),
        )
        .route(
            "/spreadsheets/{id}/players/{name}/actions",
            post(spreadsheets::player_action),
        )
        .route("/matches", get(matches::list).post(matches::create))
        .route(
            "/matches/{id}",
            get(matches::get)
                .put(matches::update)
                .delete(matches::remove),
        )
        .route("/webpages", get(webpages::list).post(webpages::create))
        .route(
            "/webpages/{id}",
            get(webpages::get)
                .put(webpages::update)
                .delete(webpages::remove),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
        .with_state(state);

    Router::new().merge(public).merge(protected)
}
