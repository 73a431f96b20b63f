use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use tchouk_types::api::{
    AddPlayerRequest, CreateSpreadsheetRequest, StatusMessage, UpdateSpreadsheetRequest,
};
use tchouk_types::models::{Spreadsheet, duplicate_player_name};
use tchouk_types::player::{Player, PlayerAction};
use tchouk_types::{Entity, EntityId};

use crate::auth::AppState;
use crate::error::{ApiError, or_not_found};

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let sheets = state.store.find_all::<Spreadsheet>()?;
    Ok(Json(sheets))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateSpreadsheetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation(
            "Please provide a name for the Spreadsheet".into(),
        ));
    }
    if let Some(dup) = duplicate_player_name(&req.players) {
        return Err(ApiError::Validation(format!(
            "Duplicate player name '{dup}'"
        )));
    }

    let sheet = Spreadsheet {
        id: EntityId::NIL,
        name: req.name,
        players: req.players,
    };
    let sheet = state.store.insert(sheet)?;
    Ok((StatusCode::CREATED, Json(sheet)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = EntityId::parse(&id)?;
    let sheet = state
        .store
        .find_by_id::<Spreadsheet>(id)
        .map_err(|e| or_not_found(e, "Spreadsheet not found"))?;
    Ok(Json(sheet))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateSpreadsheetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = EntityId::parse(&id)?;
    let mut sheet = state
        .store
        .find_by_id::<Spreadsheet>(id)
        .map_err(|e| or_not_found(e, "Spreadsheet not found"))?;

    if let Some(name) = req.name.filter(|n| !n.trim().is_empty()) {
        sheet.set_name(name);
    }
    if let Some(players) = req.players {
        if let Some(dup) = duplicate_player_name(&players) {
            return Err(ApiError::Validation(format!(
                "Duplicate player name '{dup}'"
            )));
        }
        sheet.players = players;
    }

    let outcome = state.store.update(&sheet)?;
    if outcome.matched == 0 {
        return Err(ApiError::NotFound("Spreadsheet not found"));
    }
    Ok(Json(sheet))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = EntityId::parse(&id)?;
    let deleted = state.store.delete::<Spreadsheet>(id)?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Spreadsheet not found"));
    }
    Ok(Json(StatusMessage {
        code: 200,
        message: "Successfully deleted".into(),
    }))
}

// -- Player sub-resources --

pub async fn add_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddPlayerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation(
            "Please provide a name for the Player".into(),
        ));
    }

    let id = EntityId::parse(&id)?;
    let mut sheet = state
        .store
        .find_by_id::<Spreadsheet>(id)
        .map_err(|e| or_not_found(e, "Spreadsheet not found"))?;

    if sheet.player(&req.name).is_some() {
        return Err(ApiError::Validation(format!(
            "Player '{}' already exists",
            req.name
        )));
    }

    sheet.players.push(Player::named(req.name));
    let outcome = state.store.update(&sheet)?;
    if outcome.matched == 0 {
        return Err(ApiError::NotFound("Spreadsheet not found"));
    }
    Ok((StatusCode::CREATED, Json(sheet)))
}

pub async fn remove_player(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let id = EntityId::parse(&id)?;
    let mut sheet = state
        .store
        .find_by_id::<Spreadsheet>(id)
        .map_err(|e| or_not_found(e, "Spreadsheet not found"))?;

    let before = sheet.players.len();
    sheet.players.retain(|p| p.name != name);
    if sheet.players.len() == before {
        return Err(ApiError::NotFound("Player not found"));
    }

    let outcome = state.store.update(&sheet)?;
    if outcome.matched == 0 {
        return Err(ApiError::NotFound("Spreadsheet not found"));
    }
    Ok(Json(sheet))
}

/// One scorer correction: load the whole sheet, route the action to the
/// named player's counter, write the whole sheet back. The aggregate is
/// rewritten as a unit; there is no per-player update path.
pub async fn player_action(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
    Json(action): Json<PlayerAction>,
) -> Result<impl IntoResponse, ApiError> {
    let id = EntityId::parse(&id)?;
    let mut sheet = state
        .store
        .find_by_id::<Spreadsheet>(id)
        .map_err(|e| or_not_found(e, "Spreadsheet not found"))?;

    let player = sheet
        .player_mut(&name)
        .ok_or(ApiError::NotFound("Player not found"))?;
    player
        .apply(&action)
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    let player = player.clone();

    let outcome = state.store.update(&sheet)?;
    if outcome.matched == 0 {
        return Err(ApiError::NotFound("Spreadsheet not found"));
    }
    Ok(Json(player))
}
