use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use docstore_core::{DocStore, WriteMode};

use crate::dto::{
    bulk_get_item_json, bulk_write_item_json, doc_ref_json, AllDocsResponse, DbInfoResponse,
};
use crate::errors::ApiError;
use crate::extractors::ValidJson;
use crate::state::AppState;

pub async fn server_info() -> impl IntoResponse {
    Json(json!({ "service": "docstore", "status": "ok" }))
}

pub async fn create_db(
    State(state): State<AppState>,
    Path(db): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.registry.create(&db)?;
    tracing::info!(db = %db, "database created");
    Ok(StatusCode::CREATED)
}

pub async fn get_db(
    State(state): State<AppState>,
    Path(db): Path<String>,
) -> Result<Json<DbInfoResponse>, ApiError> {
    let store = state.registry.get(&db)?;
    Ok(Json(DbInfoResponse::new(&db, store.info())))
}

pub async fn delete_db(
    State(state): State<AppState>,
    Path(db): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.registry.drop(&db)?;
    tracing::info!(db = %db, "database dropped");
    Ok(StatusCode::OK)
}

pub async fn cat_dbs(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.registry.list())
}

pub async fn post_doc(
    State(state): State<AppState>,
    Path(db): Path<String>,
    ValidJson(body): ValidJson<Value>,
) -> Result<Json<Value>, ApiError> {
    let store = state.registry.get(&db)?;
    let doc_ref = store.write(WriteMode::Post, body)?;
    tracing::debug!(db = %db, id = %doc_ref.id, rev = %doc_ref.rev, "document created or updated");
    Ok(Json(doc_ref_json(&doc_ref)))
}

pub async fn put_doc(
    State(state): State<AppState>,
    Path((db, id)): Path<(String, String)>,
    ValidJson(body): ValidJson<Value>,
) -> Result<Json<Value>, ApiError> {
    let store = state.registry.get(&db)?;
    let doc_ref = store.write(WriteMode::Put { url_id: id }, body)?;
    tracing::debug!(db = %db, id = %doc_ref.id, rev = %doc_ref.rev, "document written by id");
    Ok(Json(doc_ref_json(&doc_ref)))
}

pub async fn get_doc(
    State(state): State<AppState>,
    Path((db, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let store = state.registry.get(&db)?;
    let doc = store.get_doc(&id)?;
    Ok(Json(doc))
}

#[derive(Deserialize)]
pub struct DeleteDocQuery {
    rev: Option<String>,
}

pub async fn delete_doc(
    State(state): State<AppState>,
    Path((db, id)): Path<(String, String)>,
    Query(query): Query<DeleteDocQuery>,
) -> Result<Json<Value>, ApiError> {
    let store = state.registry.get(&db)?;
    let doc_ref = store.delete_doc(&id, query.rev.as_deref())?;
    tracing::debug!(db = %db, id = %doc_ref.id, rev = %doc_ref.rev, "document deleted");
    Ok(Json(doc_ref_json(&doc_ref)))
}

fn bulk_docs_from_envelope(envelope: Value) -> Result<Vec<Value>, ApiError> {
    let Value::Object(mut obj) = envelope else {
        return Err(ApiError(docstore_core::CoreError::InvalidBody));
    };
    match obj.remove("_docs") {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(ApiError(docstore_core::CoreError::EmptyBulk)),
    }
}

pub async fn bulk_docs(
    State(state): State<AppState>,
    Path(db): Path<String>,
    ValidJson(envelope): ValidJson<Value>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let store = state.registry.get(&db)?;
    let items = bulk_docs_from_envelope(envelope)?;
    let results = store.bulk_put(items)?;
    Ok(Json(results.iter().map(bulk_write_item_json).collect()))
}

pub async fn bulk_gets(
    State(state): State<AppState>,
    Path(db): Path<String>,
    ValidJson(envelope): ValidJson<Value>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let store = state.registry.get(&db)?;
    let items = bulk_docs_from_envelope(envelope)?;
    let results = store.bulk_get(items)?;
    Ok(Json(results.iter().map(bulk_get_item_json).collect()))
}

#[derive(Deserialize)]
pub struct AllDocsQuery {
    page: Option<u64>,
    limit: Option<u64>,
}

pub async fn all_docs(
    State(state): State<AppState>,
    Path(db): Path<String>,
    Query(query): Query<AllDocsQuery>,
) -> Result<Json<AllDocsResponse>, ApiError> {
    let store: Arc<DocStore> = state.registry.get(&db)?;
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);
    Ok(Json(store.all_docs(page, limit).into()))
}
