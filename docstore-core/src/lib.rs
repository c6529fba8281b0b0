//! In-memory document store core: identifier/revision generation, request
//! validation, the per-database revision engine, and the process-wide
//! database registry. Deliberately has no knowledge of HTTP — that
//! translation lives in `docstore-server`.

pub mod document;
pub mod errors;
pub mod id_gen;
pub mod registry;
pub mod store;
pub mod validator;

pub use document::{Document, DESIGN_DOC_ID};
pub use errors::{CoreError, CoreResult};
pub use id_gen::IdGen;
pub use registry::Registry;
pub use store::{AllDocsPage, AllDocsRow, BulkItem, DbInfo, DocRef, DocStore, WriteMode};
pub use validator::Validator;
