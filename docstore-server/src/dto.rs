use serde::Serialize;
use serde_json::{json, Value};

use docstore_core::{AllDocsPage, BulkItem, DbInfo, DocRef};

#[derive(Serialize)]
pub struct DbInfoResponse {
    pub name: String,
    pub doc_count: u64,
    pub deleted_doc_count: u64,
    pub update_seq: String,
}

impl DbInfoResponse {
    pub fn new(name: &str, info: DbInfo) -> Self {
        Self {
            name: name.to_string(),
            doc_count: info.doc_count,
            deleted_doc_count: info.deleted_doc_count,
            update_seq: info.update_seq,
        }
    }
}

pub fn doc_ref_json(doc_ref: &DocRef) -> Value {
    json!({ "_id": doc_ref.id, "_rev": doc_ref.rev })
}

/// A bulk item result as the JSON shape the test corpus expects: success
/// entries carry `_id`/`_rev` (or the full document for `_bulk_gets`),
/// failures carry `{"error": tag}` plus an optional `_id`.
pub fn bulk_write_item_json(item: &BulkItem<DocRef>) -> Value {
    match item {
        BulkItem::Ok(doc_ref) => doc_ref_json(doc_ref),
        BulkItem::Err { id, error } => bulk_error_json(id.as_deref(), error.tag()),
    }
}

pub fn bulk_get_item_json(item: &BulkItem<Value>) -> Value {
    match item {
        BulkItem::Ok(doc) => doc.clone(),
        BulkItem::Err { id, error } => bulk_error_json(id.as_deref(), error.tag()),
    }
}

fn bulk_error_json(id: Option<&str>, tag: &str) -> Value {
    match id {
        Some(id) => json!({ "_id": id, "error": tag }),
        None => json!({ "error": tag }),
    }
}

#[derive(Serialize)]
pub struct AllDocsRowResponse {
    pub id: String,
    pub key: String,
    pub value: AllDocsRowValue,
}

#[derive(Serialize)]
pub struct AllDocsRowValue {
    pub rev: String,
}

#[derive(Serialize)]
pub struct AllDocsResponse {
    pub rows: Vec<AllDocsRowResponse>,
    pub total_rows: u64,
    pub offset: u64,
}

impl From<AllDocsPage> for AllDocsResponse {
    fn from(page: AllDocsPage) -> Self {
        Self {
            rows: page
                .rows
                .into_iter()
                .map(|row| AllDocsRowResponse {
                    id: row.id.clone(),
                    key: row.id,
                    value: AllDocsRowValue { rev: row.rev },
                })
                .collect(),
            total_rows: page.total_rows,
            offset: page.offset,
        }
    }
}
