use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use tchouk_store::StoreError;
use tchouk_types::{Entity, EntityId};
use tchouk_types::api::{CreateMatchRequest, StatusMessage, UpdateMatchRequest};
use tchouk_types::models::{Match, Spreadsheet, duplicate_player_name};
use tchouk_types::player::Player;

use crate::auth::AppState;
use crate::error::{ApiError, or_not_found};

const THIRDS: [(&str, &str); 3] = [
    ("first", "First"),
    ("second", "Second"),
    ("third", "Third"),
];

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let matches = state.store.find_all::<Match>()?;
    Ok(Json(matches))
}

/// Creating a match cascades: one spreadsheet per third, seeded with the
/// declared players, then the match itself pointing at all three. The name
/// collision check runs first so a rejected create leaves nothing behind.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateMatchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation(
            "Please provide a name for the Match".into(),
        ));
    }

    match state.store.find_by_name::<Match>(&req.name) {
        Ok(_) => return Err(ApiError::Validation("Match name already used".into())),
        Err(StoreError::NotFound) => {}
        Err(other) => return Err(other.into()),
    }

    let players: Vec<Player> = req.players.iter().cloned().map(Player::named).collect();
    if let Some(dup) = duplicate_player_name(&players) {
        return Err(ApiError::Validation(format!(
            "Duplicate player name '{dup}'"
        )));
    }

    let mut thirds = HashMap::new();
    for (key, label) in THIRDS {
        let sheet = Spreadsheet {
            id: EntityId::NIL,
            name: format!("{} - {label} Third", req.name),
            players: players.clone(),
        };
        let sheet = state.store.insert(sheet)?;
        thirds.insert(key.to_string(), sheet.id);
    }

    let record = Match {
        id: EntityId::NIL,
        name: req.name,
        thirds,
        created_at: req.created_at.unwrap_or_else(Utc::now),
    };
    let record = state.store.insert(record)?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = EntityId::parse(&id)?;
    let record = state
        .store
        .find_by_id::<Match>(id)
        .map_err(|e| or_not_found(e, "Match not found"))?;
    Ok(Json(record))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateMatchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = EntityId::parse(&id)?;
    let mut record = state
        .store
        .find_by_id::<Match>(id)
        .map_err(|e| or_not_found(e, "Match not found"))?;

    if let Some(name) = req.name.filter(|n| !n.trim().is_empty()) {
        record.set_name(name);
    }

    let outcome = state.store.update(&record)?;
    if outcome.matched == 0 {
        return Err(ApiError::NotFound("Match not found"));
    }

    Ok(Json(record))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = EntityId::parse(&id)?;
    let deleted = state.store.delete::<Match>(id)?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Match not found"));
    }
    Ok(Json(StatusMessage {
        code: 200,
        message: "Successfully deleted".into(),
    }))
}
