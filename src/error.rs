use thiserror::Error;

use crate::schema::Kind;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("`{attribute}` is not valid on a schema of kind `{kind}`")]
    KindMismatch { attribute: &'static str, kind: Kind },

    #[error("unknown schema kind `{0}`")]
    UnknownKind(String),

    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("unknown attribute `{0}`")]
    UnknownAttribute(String),

    #[error("invalid value `{value}` for `{attribute}`: {reason}")]
    InvalidValue {
        attribute: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("failed to serialize schema: {0}")]
    Json(#[from] serde_json::Error),
}
