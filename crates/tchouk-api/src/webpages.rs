use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use tchouk_types::api::{StatusMessage, UpdateWebpageRequest};
use tchouk_types::models::{Webpage, WebpageRecord};
use tchouk_types::{Entity, EntityId, Widget};

use crate::auth::AppState;
use crate::error::{ApiError, or_not_found};

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let records = state.store.find_all::<WebpageRecord>()?;
    let pages: Vec<Webpage> = records.iter().map(WebpageRecord::to_domain).collect();
    Ok(Json(pages))
}

pub async fn create(
    State(state): State<AppState>,
    Json(page): Json<Webpage>,
) -> Result<impl IntoResponse, ApiError> {
    if page.name.trim().is_empty() {
        return Err(ApiError::Validation(
            "Please provide a name for the Webpage".into(),
        ));
    }
    if page.src.trim().is_empty() {
        return Err(ApiError::Validation(
            "Please provide a source URL for the Webpage".into(),
        ));
    }

    let record = state.store.insert(page.to_record()?)?;
    Ok((StatusCode::CREATED, Json(record.to_domain())))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = EntityId::parse(&id)?;
    let record = state
        .store
        .find_by_id::<WebpageRecord>(id)
        .map_err(|e| or_not_found(e, "Webpage not found"))?;
    Ok(Json(record.to_domain()))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateWebpageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = EntityId::parse(&id)?;
    let mut record = state
        .store
        .find_by_id::<WebpageRecord>(id)
        .map_err(|e| or_not_found(e, "Webpage not found"))?;

    if let Some(name) = req.name.filter(|n| !n.trim().is_empty()) {
        record.set_name(name);
    }
    if let Some(description) = req.description {
        record.description = (!description.is_empty()).then_some(description);
    }
    if let Some(src) = req.src.filter(|s| !s.trim().is_empty()) {
        record.src = src;
    }
    if let Some(size) = req.size {
        record.set_size(Some(size));
    }
    if let Some(position) = req.position {
        record.set_position(Some(position));
    }

    let outcome = state.store.update(&record)?;
    if outcome.matched == 0 {
        return Err(ApiError::NotFound("Webpage not found"));
    }
    Ok(Json(record.to_domain()))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = EntityId::parse(&id)?;
    let deleted = state.store.delete::<WebpageRecord>(id)?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Webpage not found"));
    }
    Ok(Json(StatusMessage {
        code: 200,
        message: "Successfully deleted".into(),
    }))
}
