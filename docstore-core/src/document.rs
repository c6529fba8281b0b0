use serde_json::{Map, Value};

/// The reserved id of the design-document slot, seeded at database creation.
pub const DESIGN_DOC_ID: &str = "_design/_views";

/// A stored document: identifier, revision, tombstone flag, and body with
/// the reserved fields (`_id`, `_rev`, `_deleted`) already stripped out.
/// Any other leading-underscore field the client set is preserved
/// verbatim inside `body`.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub rev: String,
    pub deleted: bool,
    pub body: Map<String, Value>,
}

impl Document {
    /// The `N` in `_rev = "N-hash"`. Defaults to 0 if somehow unparsable —
    /// that can only happen if a revision was constructed outside `IdGen`.
    pub fn generation(&self) -> u64 {
        self.rev
            .split('-')
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }

    /// The full document as returned to clients: body plus `_id`/`_rev`.
    pub fn to_json(&self) -> Value {
        let mut out = self.body.clone();
        out.insert("_id".to_string(), Value::String(self.id.clone()));
        out.insert("_rev".to_string(), Value::String(self.rev.clone()));
        Value::Object(out)
    }
}
