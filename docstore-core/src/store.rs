use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::document::{Document, DESIGN_DOC_ID};
use crate::errors::{CoreError, CoreResult};
use crate::id_gen::IdGen;
use crate::validator::Validator;

/// How the target document id is resolved for a write.
#[derive(Debug, Clone)]
pub enum WriteMode {
    /// `PUT /{db}/{id}`: target id comes from the URL. A body `_id` that
    /// disagrees with it is a conflict.
    Put { url_id: String },
    /// `POST /{db}` and every `_bulk_docs` item: target id comes from the
    /// body's `_id` if present, else a fresh id is generated.
    Post,
}

/// `{_id, _rev}` returned on a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocRef {
    pub id: String,
    pub rev: String,
}

/// Per-item result of `bulk_put`/`bulk_get`: either a success payload or a
/// tagged error, optionally carrying the id the failure occurred against.
#[derive(Debug, Clone)]
pub enum BulkItem<T> {
    Ok(T),
    Err {
        id: Option<String>,
        error: CoreError,
    },
}

/// Snapshot of database-level metadata, as returned by `GET /{db}`.
#[derive(Debug, Clone)]
pub struct DbInfo {
    pub doc_count: u64,
    pub deleted_doc_count: u64,
    pub update_seq: String,
}

/// One row of an `_all_docs` page.
#[derive(Debug, Clone)]
pub struct AllDocsRow {
    pub id: String,
    pub rev: String,
}

/// `_all_docs` page result.
#[derive(Debug, Clone)]
pub struct AllDocsPage {
    pub rows: Vec<AllDocsRow>,
    pub total_rows: u64,
    pub offset: u64,
}

struct DocStoreInner {
    docs: HashMap<String, Document>,
    order: Vec<String>,
    doc_count: u64,
    deleted_doc_count: u64,
    update_seq: String,
}

/// Per-database document map, revision engine, and counters.
///
/// A single `RwLock` guards `docs`/`order`/counters/`update_seq` together
/// so that every accepted mutation updates all of them atomically. Writers
/// take the write guard; plain reads (`get_doc`, `bulk_get`) take the read
/// guard, since they only need a consistent snapshot, not exclusivity
/// against other readers.
pub struct DocStore {
    id_gen: IdGen,
    inner: RwLock<DocStoreInner>,
}

enum Outcome {
    Create,
    Update,
    Tombstone,
    Recreate,
}

impl DocStore {
    /// A freshly created database: seeded with `_design/_views` at
    /// generation 1, so `doc_count` starts at 1 and `update_seq` is
    /// populated from birth.
    pub fn new() -> Self {
        let id_gen = IdGen::new();
        let rev = id_gen.new_rev(1, None);
        let update_seq = id_gen.new_update_seq();

        let design_doc = Document {
            id: DESIGN_DOC_ID.to_string(),
            rev,
            deleted: false,
            body: Map::new(),
        };

        let mut docs = HashMap::new();
        docs.insert(DESIGN_DOC_ID.to_string(), design_doc);

        Self {
            id_gen,
            inner: RwLock::new(DocStoreInner {
                docs,
                order: vec![DESIGN_DOC_ID.to_string()],
                doc_count: 1,
                deleted_doc_count: 0,
                update_seq,
            }),
        }
    }

    pub fn info(&self) -> DbInfo {
        let inner = self.inner.read();
        DbInfo {
            doc_count: inner.doc_count,
            deleted_doc_count: inner.deleted_doc_count,
            update_seq: inner.update_seq.clone(),
        }
    }

    pub fn get_doc(&self, id: &str) -> CoreResult<Value> {
        let inner = self.inner.read();
        match inner.docs.get(id) {
            Some(doc) if !doc.deleted => Ok(doc.to_json()),
            _ => Err(CoreError::DocNotFound),
        }
    }

    pub fn write(&self, mode: WriteMode, body: Value) -> CoreResult<DocRef> {
        let mut inner = self.inner.write();
        self.write_locked(&mut inner, mode, body)
    }

    pub fn delete_doc(&self, id: &str, rev: Option<&str>) -> CoreResult<DocRef> {
        let mut body = Map::new();
        if let Some(rev) = rev {
            body.insert("_rev".to_string(), Value::String(rev.to_string()));
        }
        body.insert("_deleted".to_string(), Value::Bool(true));
        self.write(
            WriteMode::Put {
                url_id: id.to_string(),
            },
            Value::Object(body),
        )
    }

    /// All items in the envelope are applied under a single lock
    /// acquisition so intra-bulk ordering is deterministic and no other
    /// writer can interleave, but each item's acceptance/rejection is
    /// independent — one bad item never fails its siblings.
    pub fn bulk_put(&self, items: Vec<Value>) -> CoreResult<Vec<BulkItem<DocRef>>> {
        if items.is_empty() {
            return Err(CoreError::EmptyBulk);
        }
        let mut inner = self.inner.write();
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let attempted_id = item.get("_id").and_then(canonical_id_opt);
            match self.write_locked(&mut inner, WriteMode::Post, item) {
                Ok(doc_ref) => out.push(BulkItem::Ok(doc_ref)),
                Err(error) => out.push(BulkItem::Err {
                    id: attempted_id,
                    error,
                }),
            }
        }
        Ok(out)
    }

    /// A present-but-mismatched `_rev` surfaces as `doc_not_found`, not
    /// `doc_conflict`, in this read-only bulk API: there is no write to
    /// conflict with, only a revision that isn't the one stored. Rev-format
    /// validation runs before id resolution, so a malformed `_rev` is
    /// reported even when `_id` is also missing or unresolvable.
    pub fn bulk_get(&self, items: Vec<Value>) -> CoreResult<Vec<BulkItem<Value>>> {
        if items.is_empty() {
            return Err(CoreError::EmptyBulk);
        }
        let inner = self.inner.read();
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let attempted_id = item.get("_id").and_then(canonical_id_opt);
            let rev = item.get("_rev").and_then(Value::as_str);

            if let Some(rev) = rev {
                if !Validator::is_valid_rev(rev) {
                    out.push(BulkItem::Err {
                        id: attempted_id,
                        error: CoreError::InvalidRevId,
                    });
                    continue;
                }
            }

            let id = match attempted_id {
                Some(id) => id,
                None => {
                    out.push(BulkItem::Err {
                        id: None,
                        error: CoreError::DocNotFound,
                    });
                    continue;
                }
            };

            match inner.docs.get(&id) {
                Some(doc) if !doc.deleted && rev.is_none_or_matches(&doc.rev) => {
                    out.push(BulkItem::Ok(doc.to_json()))
                }
                _ => out.push(BulkItem::Err {
                    id: Some(id),
                    error: CoreError::DocNotFound,
                }),
            }
        }
        Ok(out)
    }

    pub fn all_docs(&self, page: u64, limit: u64) -> AllDocsPage {
        let inner = self.inner.read();
        let page = page.max(1);
        let limit = limit.max(1);
        let start = (page - 1) * limit;

        let rows: Vec<AllDocsRow> = inner
            .order
            .iter()
            .filter_map(|id| inner.docs.get(id))
            .filter(|doc| !doc.deleted)
            .skip(start as usize)
            .take(limit as usize)
            .map(|doc| AllDocsRow {
                id: doc.id.clone(),
                rev: doc.rev.clone(),
            })
            .collect();

        AllDocsPage {
            rows,
            total_rows: inner.doc_count,
            offset: 1 + start,
        }
    }

    fn write_locked(
        &self,
        inner: &mut DocStoreInner,
        mode: WriteMode,
        body: Value,
    ) -> CoreResult<DocRef> {
        let Value::Object(mut obj) = body else {
            return Err(CoreError::InvalidBody);
        };

        let rev_val = obj.remove("_rev");
        let deleted_val = obj.remove("_deleted");
        let id_val = obj.remove("_id");

        let is_post = matches!(mode, WriteMode::Post);
        let target_id = match mode {
            WriteMode::Put { url_id } => {
                if let Some(id_val) = &id_val {
                    let body_id = canonical_id(id_val)?;
                    if body_id != url_id {
                        return Err(CoreError::DocConflict);
                    }
                }
                url_id
            }
            WriteMode::Post => match &id_val {
                Some(id_val) => canonical_id(id_val)?,
                None => self.id_gen.new_doc_id(),
            },
        };

        let deleted_flag = matches!(deleted_val, Some(Value::Bool(true)));

        let rev_opt = match &rev_val {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(CoreError::InvalidRevId),
        };
        if let Some(rev) = &rev_opt {
            if !Validator::is_valid_rev(rev) {
                return Err(CoreError::InvalidRevId);
            }
        }

        let head = inner.docs.get(&target_id).cloned();
        let outcome = decide(head.as_ref(), rev_opt.as_deref(), deleted_flag, is_post)?;

        let new_generation = match outcome {
            Outcome::Create => 1,
            Outcome::Update | Outcome::Tombstone => head.as_ref().unwrap().generation() + 1,
            Outcome::Recreate => head.as_ref().unwrap().generation() + 2,
        };
        let new_deleted = matches!(outcome, Outcome::Tombstone);

        let new_rev = self
            .id_gen
            .new_rev(new_generation, head.as_ref().map(|h| h.rev.as_str()));

        let was_new = head.is_none();
        let old_live = head.as_ref().map(|h| !h.deleted).unwrap_or(false);
        let new_live = !new_deleted;

        let new_doc = Document {
            id: target_id.clone(),
            rev: new_rev.clone(),
            deleted: new_deleted,
            body: obj,
        };
        inner.docs.insert(target_id.clone(), new_doc);

        if was_new {
            inner.order.push(target_id.clone());
            if new_live {
                inner.doc_count += 1;
            } else {
                inner.deleted_doc_count += 1;
            }
        } else if old_live && !new_live {
            inner.doc_count -= 1;
            inner.deleted_doc_count += 1;
        } else if !old_live && new_live {
            inner.doc_count += 1;
            inner.deleted_doc_count -= 1;
        }

        inner.update_seq = self.id_gen.new_update_seq();

        Ok(DocRef {
            id: target_id,
            rev: new_rev,
        })
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new()
    }
}

trait RevMatch {
    fn is_none_or_matches(&self, head_rev: &str) -> bool;
}

impl RevMatch for Option<&str> {
    fn is_none_or_matches(&self, head_rev: &str) -> bool {
        match self {
            None => true,
            Some(rev) => *rev == head_rev,
        }
    }
}

fn canonical_id_opt(value: &Value) -> Option<String> {
    canonical_id(value).ok()
}

fn canonical_id(value: &Value) -> CoreResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(CoreError::InvalidBody),
    }
}

/// Decides the write outcome (create/update/tombstone/recreate) or rejects
/// it, from the head document's state plus the incoming rev/deleted flag.
/// Revision *format* is validated by the caller before this runs, so `rev`
/// here is either absent or well-formed; this function only needs to
/// compare it against the head's revision.
fn decide(
    head: Option<&Document>,
    rev: Option<&str>,
    deleted_flag: bool,
    is_post: bool,
) -> CoreResult<Outcome> {
    match (head, rev) {
        (None, None) => {
            if deleted_flag {
                if is_post {
                    Err(CoreError::ReservedField)
                } else {
                    Err(CoreError::DocConflict)
                }
            } else {
                Ok(Outcome::Create)
            }
        }
        (None, Some(_)) => Err(CoreError::DocConflict),
        (Some(head), None) if !head.deleted => Err(CoreError::DocConflict),
        (Some(head), Some(rev)) if !head.deleted => {
            if rev != head.rev {
                Err(CoreError::DocConflict)
            } else if deleted_flag {
                Ok(Outcome::Tombstone)
            } else {
                Ok(Outcome::Update)
            }
        }
        (Some(_tombstone), None) => {
            if deleted_flag {
                if is_post {
                    Err(CoreError::ReservedField)
                } else {
                    Err(CoreError::DocConflict)
                }
            } else {
                Ok(Outcome::Recreate)
            }
        }
        (Some(_tombstone), Some(_)) => Err(CoreError::DocConflict),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fresh_store_is_seeded_with_design_doc() {
        let store = DocStore::new();
        let info = store.info();
        assert_eq!(info.doc_count, 1);
        assert_eq!(info.deleted_doc_count, 0);
        assert_eq!(info.update_seq.len(), 138);

        let doc = store.get_doc(DESIGN_DOC_ID).unwrap();
        assert_eq!(doc["_id"], DESIGN_DOC_ID);
        assert!(doc["_rev"].as_str().unwrap().starts_with("1-"));
    }

    #[test]
    fn create_then_update_then_tombstone_then_recreate_skips_a_generation() {
        let store = DocStore::new();

        let created = store
            .write(WriteMode::Post, json!({"foo": "bar"}))
            .unwrap();
        assert!(created.rev.starts_with("1-"));

        let updated = store
            .write(
                WriteMode::Post,
                json!({"foo": "bar", "_id": created.id, "_rev": created.rev}),
            )
            .unwrap();
        assert!(updated.rev.starts_with("2-"));

        let updated2 = store
            .write(
                WriteMode::Put {
                    url_id: created.id.clone(),
                },
                json!({"foo": "bar", "_rev": updated.rev}),
            )
            .unwrap();
        assert!(updated2.rev.starts_with("3-"));

        // stale rev (gen 2) against a live gen-3 head -> conflict
        let stale = store.delete_doc(&created.id, Some(&updated.rev));
        assert_eq!(stale.unwrap_err(), CoreError::DocConflict);

        let deleted = store.delete_doc(&created.id, Some(&updated2.rev)).unwrap();
        assert!(deleted.rev.starts_with("4-"));

        // deleting an already-tombstoned doc with its own rev is a conflict
        let redelete = store.delete_doc(&created.id, Some(&deleted.rev));
        assert_eq!(redelete.unwrap_err(), CoreError::DocConflict);

        let recreated = store
            .write(WriteMode::Post, json!({"_id": created.id}))
            .unwrap();
        assert!(recreated.rev.starts_with("5-"));
    }

    #[test]
    fn counts_stay_coherent_across_create_delete_recreate() {
        let store = DocStore::new();
        let created = store.write(WriteMode::Post, json!({})).unwrap();
        let info = store.info();
        assert_eq!(info.doc_count, 2);
        assert_eq!(info.deleted_doc_count, 0);

        let deleted = store.delete_doc(&created.id, Some(&created.rev)).unwrap();
        let info = store.info();
        assert_eq!(info.doc_count, 1);
        assert_eq!(info.deleted_doc_count, 1);

        store
            .write(WriteMode::Post, json!({"_id": created.id}))
            .unwrap();
        let info = store.info();
        assert_eq!(info.doc_count, 2);
        assert_eq!(info.deleted_doc_count, 0);
        let _ = deleted;
    }

    #[test]
    fn post_with_deleted_true_and_no_prior_doc_is_reserved_field() {
        let store = DocStore::new();
        let err = store
            .write(WriteMode::Post, json!({"_deleted": true}))
            .unwrap_err();
        assert_eq!(err, CoreError::ReservedField);
    }

    #[test]
    fn put_missing_rev_against_live_head_is_conflict_regardless_of_body() {
        let store = DocStore::new();
        let created = store.write(WriteMode::Post, json!({})).unwrap();
        let err = store
            .write(
                WriteMode::Put {
                    url_id: created.id.clone(),
                },
                json!({"deleted": true}),
            )
            .unwrap_err();
        assert_eq!(err, CoreError::DocConflict);
    }

    #[test]
    fn malformed_rev_is_rejected_before_conflict_logic() {
        let store = DocStore::new();
        let err = store
            .write(WriteMode::Post, json!({"_rev": "1"}))
            .unwrap_err();
        assert_eq!(err, CoreError::InvalidRevId);
    }

    #[test]
    fn array_body_is_invalid() {
        let store = DocStore::new();
        let err = store.write(WriteMode::Post, json!([1, 2, 3])).unwrap_err();
        assert_eq!(err, CoreError::InvalidBody);
    }

    #[test]
    fn bulk_put_empty_envelope_errors() {
        let store = DocStore::new();
        assert_eq!(store.bulk_put(vec![]).unwrap_err(), CoreError::EmptyBulk);
    }

    #[test]
    fn bulk_get_mismatched_rev_is_not_found_not_conflict() {
        let store = DocStore::new();
        let created = store.write(WriteMode::Post, json!({})).unwrap();
        let results = store
            .bulk_get(vec![
                json!({"_id": created.id, "_rev": "1-12345678123456781234567812345678"}),
            ])
            .unwrap();
        assert_eq!(results.len(), 1);
        match &results[0] {
            BulkItem::Err { error, .. } => assert_eq!(*error, CoreError::DocNotFound),
            BulkItem::Ok(_) => panic!("expected doc_not_found"),
        }
    }

    #[test]
    fn bulk_get_malformed_rev_wins_over_missing_id() {
        let store = DocStore::new();
        let results = store.bulk_get(vec![json!({"_rev": "1"})]).unwrap();
        assert_eq!(results.len(), 1);
        match &results[0] {
            BulkItem::Err { error, .. } => assert_eq!(*error, CoreError::InvalidRevId),
            BulkItem::Ok(_) => panic!("expected invalid_rev_id"),
        }
    }

    #[test]
    fn delete_with_no_rev_is_conflict_not_invalid_rev() {
        let store = DocStore::new();
        let created = store.write(WriteMode::Post, json!({})).unwrap();
        let err = store.delete_doc(&created.id, None).unwrap_err();
        assert_eq!(err, CoreError::DocConflict);
    }

    #[test]
    fn all_docs_pagination_offsets() {
        let store = DocStore::new();
        for _ in 0..12 {
            store.write(WriteMode::Post, json!({})).unwrap();
        }
        let page1 = store.all_docs(1, 10);
        assert_eq!(page1.rows.len(), 10);
        assert_eq!(page1.total_rows, 13);
        assert_eq!(page1.offset, 1);

        let page2 = store.all_docs(2, 10);
        assert_eq!(page2.rows.len(), 3);
        assert_eq!(page2.offset, 11);

        let all = store.all_docs(1, 13);
        assert_eq!(all.rows.len(), 13);
        assert!(all.rows.iter().any(|r| r.id == DESIGN_DOC_ID));
    }
}
