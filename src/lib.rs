//! Composable JSON Schema builder.
//!
//! Build a typed [`Schema`] with the kind constructors and modifiers in
//! [`combinators`], then turn it into a JSON Schema document with [`encode`].
pub mod attr;
pub mod combinators;
pub mod encode;
pub mod error;
pub mod format;
pub mod schema;

pub use attr::Attr;
pub use combinators::*;
pub use encode::{encode, to_json_string, to_json_string_pretty};
pub use error::SchemaError;
pub use format::Format;
pub use schema::{
    Annotations, ArraySchema, Composition, IntegerSchema, Kind, NumberSchema, ObjectSchema,
    Property, Schema, StringSchema,
};
