//! Typed schema model.
//!
//! One variant per kind, each carrying only the attributes that kind accepts.
//! Values are plain owned trees: nothing is shared, nothing is mutated once a
//! constructor hands it back.
use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;
use crate::format::Format;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Object(ObjectSchema),
    Array(ArraySchema),
    String(StringSchema),
    Integer(IntegerSchema),
    Number(NumberSchema),
    Boolean(Annotations),
    Null(Annotations),
    OneOf(Composition),
    AllOf(Composition),
    AnyOf(Composition),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
    Null,
    OneOf,
    AllOf,
    AnyOf,
}

/// Title and description, valid on every kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub meta: Annotations,
    pub properties: Vec<Property>, // declaration order
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub schema: Schema,
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArraySchema {
    pub meta: Annotations,
    pub items: Option<Box<Schema>>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    pub meta: Annotations,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    pub format: Option<Format>,
    pub enum_values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegerSchema {
    pub meta: Annotations,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    pub enum_values: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSchema {
    pub meta: Annotations,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub enum_values: Option<Vec<f64>>,
}

/// Body of a `oneOf` / `allOf` / `anyOf` node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    pub meta: Annotations,
    pub subschemas: Vec<Schema>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Schema {
    /// A node of `kind` with every attribute unset.
    pub fn empty(kind: Kind) -> Self {
        match kind {
            Kind::Object  => Schema::Object(ObjectSchema::default()),
            Kind::Array   => Schema::Array(ArraySchema::default()),
            Kind::String  => Schema::String(StringSchema::default()),
            Kind::Integer => Schema::Integer(IntegerSchema::default()),
            Kind::Number  => Schema::Number(NumberSchema::default()),
            Kind::Boolean => Schema::Boolean(Annotations::default()),
            Kind::Null    => Schema::Null(Annotations::default()),
            Kind::OneOf   => Schema::OneOf(Composition::default()),
            Kind::AllOf   => Schema::AllOf(Composition::default()),
            Kind::AnyOf   => Schema::AnyOf(Composition::default()),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Schema::Object(_)  => Kind::Object,
            Schema::Array(_)   => Kind::Array,
            Schema::String(_)  => Kind::String,
            Schema::Integer(_) => Kind::Integer,
            Schema::Number(_)  => Kind::Number,
            Schema::Boolean(_) => Kind::Boolean,
            Schema::Null(_)    => Kind::Null,
            Schema::OneOf(_)   => Kind::OneOf,
            Schema::AllOf(_)   => Kind::AllOf,
            Schema::AnyOf(_)   => Kind::AnyOf,
        }
    }

    pub fn annotations(&self) -> &Annotations {
        match self {
            Schema::Object(o) => &o.meta,
            Schema::Array(a) => &a.meta,
            Schema::String(s) => &s.meta,
            Schema::Integer(i) => &i.meta,
            Schema::Number(n) => &n.meta,
            Schema::Boolean(m) | Schema::Null(m) => m,
            Schema::OneOf(c) | Schema::AllOf(c) | Schema::AnyOf(c) => &c.meta,
        }
    }

    pub(crate) fn annotations_mut(&mut self) -> &mut Annotations {
        match self {
            Schema::Object(o) => &mut o.meta,
            Schema::Array(a) => &mut a.meta,
            Schema::String(s) => &mut s.meta,
            Schema::Integer(i) => &mut i.meta,
            Schema::Number(n) => &mut n.meta,
            Schema::Boolean(m) | Schema::Null(m) => m,
            Schema::OneOf(c) | Schema::AllOf(c) | Schema::AnyOf(c) => &mut c.meta,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.annotations().title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.annotations().description.as_deref()
    }
}

impl ObjectSchema {
    /// Names of required properties, in declaration order. Always derived
    /// from `properties`, never stored.
    ///
    /// A repeated name appears once, at its first position, and follows the
    /// requiredness of its last entry (the one whose schema gets emitted).
    pub fn required(&self) -> impl Iterator<Item = &str> {
        let props = &self.properties;
        props
            .iter()
            .enumerate()
            .filter(move |&(i, p)| !props[..i].iter().any(|q| q.name == p.name))
            .filter_map(move |(_, p)| {
                let last = props.iter().rev().find(|q| q.name == p.name)?;
                last.required.then_some(p.name.as_str())
            })
    }
}

impl Kind {
    pub const ALL: [Kind; 10] = [
        Kind::Object,
        Kind::Array,
        Kind::String,
        Kind::Integer,
        Kind::Number,
        Kind::Boolean,
        Kind::Null,
        Kind::OneOf,
        Kind::AllOf,
        Kind::AnyOf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Object  => "object",
            Kind::Array   => "array",
            Kind::String  => "string",
            Kind::Integer => "integer",
            Kind::Number  => "number",
            Kind::Boolean => "boolean",
            Kind::Null    => "null",
            Kind::OneOf   => "oneOf",
            Kind::AllOf   => "allOf",
            Kind::AnyOf   => "anyOf",
        }
    }

    pub fn is_composition(self) -> bool {
        matches!(self, Kind::OneOf | Kind::AllOf | Kind::AnyOf)
    }

    /// The `"type"` value for primitive kinds, `None` for compositions.
    pub fn type_name(self) -> Option<&'static str> {
        if self.is_composition() { None } else { Some(self.as_str()) }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = SchemaError;

    /// Accepts the wire names plus snake_case spellings of the combinators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one_of" => return Ok(Kind::OneOf),
            "all_of" => return Ok(Kind::AllOf),
            "any_of" => return Ok(Kind::AnyOf),
            _ => {}
        }
        Kind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownKind(s.to_string()))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str, required: bool) -> Property {
        Property {
            name: name.to_string(),
            schema: Schema::empty(Kind::String),
            required,
        }
    }

    #[test]
    fn required_is_filtered_in_declaration_order() {
        let obj = ObjectSchema {
            meta: Annotations::default(),
            properties: vec![prop("c", true), prop("a", false), prop("b", true)],
        };
        assert_eq!(obj.required().collect::<Vec<_>>(), ["c", "b"]);
    }

    #[test]
    fn repeated_names_follow_last_entry() {
        let obj = ObjectSchema {
            meta: Annotations::default(),
            properties: vec![
                prop("x", true),
                prop("y", true),
                prop("x", false),
                prop("y", true),
                prop("z", false),
                prop("z", true),
            ],
        };
        assert_eq!(obj.required().collect::<Vec<_>>(), ["y", "z"]);
    }

    #[test]
    fn empty_keeps_its_kind() {
        for kind in Kind::ALL {
            let s = Schema::empty(kind);
            assert_eq!(s.kind(), kind);
            assert_eq!(s.title(), None);
            assert_eq!(s.description(), None);
        }
    }

    #[test]
    fn compositions_have_no_type_name() {
        assert_eq!(Kind::Integer.type_name(), Some("integer"));
        assert_eq!(Kind::AnyOf.type_name(), None);
        assert!(Kind::AllOf.is_composition());
        assert!(!Kind::Null.is_composition());
    }

    #[test]
    fn kind_parses_wire_and_snake_names() {
        assert_eq!("oneOf".parse::<Kind>().unwrap(), Kind::OneOf);
        assert_eq!("all_of".parse::<Kind>().unwrap(), Kind::AllOf);
        assert_eq!("boolean".parse::<Kind>().unwrap(), Kind::Boolean);
        assert!(matches!("map".parse::<Kind>(), Err(SchemaError::UnknownKind(_))));
    }
}
