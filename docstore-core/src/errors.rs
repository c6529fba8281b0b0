use thiserror::Error;

/// Tagged error type for the document-store core.
///
/// Variants line up 1:1 with the tag column of the error taxonomy: the
/// tag itself is stable and is what callers across the HTTP boundary see in
/// response bodies. HTTP status mapping is deliberately not done here — it
/// lives in `docstore-server`, which is the only layer that knows what an
/// HTTP status code is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoreError {
    #[error("invalid database name")]
    InvalidDbName,

    #[error("database already exists")]
    DbExists,

    #[error("database not found")]
    DbNotFound,

    #[error("request body is not a JSON object")]
    InvalidBody,

    #[error("_rev does not match the required shape")]
    InvalidRevId,

    #[error("reserved field used illegally")]
    ReservedField,

    #[error("document update conflict")]
    DocConflict,

    #[error("document not found")]
    DocNotFound,

    #[error("bulk envelope is missing or empty")]
    EmptyBulk,
}

impl CoreError {
    /// The stable wire tag used in JSON error bodies and bulk per-item
    /// error entries (e.g. `{"error": "doc_conflict"}`).
    pub fn tag(&self) -> &'static str {
        match self {
            CoreError::InvalidDbName => "invalid_db_name",
            CoreError::DbExists => "db_exists",
            CoreError::DbNotFound => "db_not_found",
            CoreError::InvalidBody => "invalid_body",
            CoreError::InvalidRevId => "invalid_rev_id",
            CoreError::ReservedField => "reserved_field",
            CoreError::DocConflict => "doc_conflict",
            CoreError::DocNotFound => "doc_not_found",
            CoreError::EmptyBulk => "empty_bulk",
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
