use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::Value;

use tchouk_store::Document;
use tchouk_types::api::{StatusMessage, UpdateGraphRequest};
use tchouk_types::models::{Graph, GraphRecord};
use tchouk_types::{Entity, EntityId, Widget};

use crate::auth::AppState;
use crate::error::{ApiError, or_not_found};

#[derive(Debug, Deserialize)]
pub struct GraphQuery {
    #[serde(default, rename = "graphType")]
    pub graph_type: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<GraphQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let records = match query.graph_type {
        Some(kind) => {
            let mut filter = Document::new();
            filter.insert("type".into(), Value::String(kind));
            state.store.find_by_filter::<GraphRecord>(&filter)?
        }
        None => state.store.find_all::<GraphRecord>()?,
    };

    let graphs: Vec<Graph> = records.iter().map(GraphRecord::to_domain).collect();
    Ok(Json(graphs))
}

pub async fn create(
    State(state): State<AppState>,
    Json(graph): Json<Graph>,
) -> Result<impl IntoResponse, ApiError> {
    if graph.name.trim().is_empty() {
        return Err(ApiError::Validation(
            "Please provide a name for the Graph".into(),
        ));
    }

    let record = state.store.insert(graph.to_record()?)?;
    Ok((StatusCode::CREATED, Json(record.to_domain())))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = EntityId::parse(&id)?;
    let record = state
        .store
        .find_by_id::<GraphRecord>(id)
        .map_err(|e| or_not_found(e, "Graph not found"))?;
    Ok(Json(record.to_domain()))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateGraphRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = EntityId::parse(&id)?;
    let mut record = state
        .store
        .find_by_id::<GraphRecord>(id)
        .map_err(|e| or_not_found(e, "Graph not found"))?;

    if let Some(name) = req.name.filter(|n| !n.trim().is_empty()) {
        record.set_name(name);
    }
    if let Some(graph_type) = req.graph_type.filter(|t| !t.trim().is_empty()) {
        record.graph_type = graph_type;
    }
    if let Some(datasource) = req.datasource {
        record.datasource = EntityId::parse(&datasource)?;
    }
    if let Some(size) = req.size {
        record.set_size(Some(size));
    }
    if let Some(position) = req.position {
        record.set_position(Some(position));
    }

    let outcome = state.store.update(&record)?;
    if outcome.matched == 0 {
        return Err(ApiError::NotFound("Graph not found"));
    }
    Ok(Json(record.to_domain()))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = EntityId::parse(&id)?;
    let deleted = state.store.delete::<GraphRecord>(id)?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Graph not found"));
    }
    Ok(Json(StatusMessage {
        code: 200,
        message: "Successfully deleted".into(),
    }))
}
