// ─── Error ──────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("{0} is not a symbol nor a string")]
    InvalidKey(String),
    #[error("no field `{field}' in {record}")]
    NoSuchField { record: String, field: String },
    #[error("wrong number of arguments (given {given}, expected {expected})")]
    ArityMismatch { given: usize, expected: usize },
    #[error("Can't build a record from a non-object value")]
    NotAnObject,
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CBOR error: {0}")]
    CborError(String),
}
