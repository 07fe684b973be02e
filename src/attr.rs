//! Runtime-tagged attributes.
//!
//! The typed combinators reject kind/attribute mismatches at compile time.
//! Callers that only learn the kind at runtime (the CLI, anything reading
//! `key=value` text) go through [`Attr`] instead, where a mismatch is a
//! [`SchemaError::KindMismatch`] naming both sides.
use std::fmt::Display;
use std::str::FromStr;

use regex::Regex;
use tracing::trace;

use crate::combinators::{self as c, Modifier};
use crate::error::SchemaError;
use crate::format::Format;
use crate::schema::{Annotations, Composition, Kind, Property, Schema};

#[derive(Debug, Clone, PartialEq)]
pub enum Attr {
    Title(String),
    Description(String),
    Properties(Vec<Property>),
    Subschemas(Vec<Schema>),
    Items(Box<Schema>),
    MinItems(u64),
    MaxItems(u64),
    MinLength(u64),
    MaxLength(u64),
    Pattern(String),
    Format(Format),
    StringEnum(Vec<String>),
    IntegerMinimum(i64),
    IntegerMaximum(i64),
    IntegerEnum(Vec<i64>),
    NumberMinimum(f64),
    NumberMaximum(f64),
    NumberEnum(Vec<f64>),
}

impl Attr {
    /// Key this attribute is written as in `key=value` text and error
    /// messages. Matches the wire keyword except for `subschemas`, whose
    /// keyword (`oneOf`/`allOf`/`anyOf`) depends on the node's kind.
    pub fn name(&self) -> &'static str {
        match self {
            Attr::Title(_) => "title",
            Attr::Description(_) => "description",
            Attr::Properties(_) => "properties",
            Attr::Subschemas(_) => "subschemas",
            Attr::Items(_) => "items",
            Attr::MinItems(_) => "minItems",
            Attr::MaxItems(_) => "maxItems",
            Attr::MinLength(_) => "minLength",
            Attr::MaxLength(_) => "maxLength",
            Attr::Pattern(_) => "pattern",
            Attr::Format(_) => "format",
            Attr::StringEnum(_) | Attr::IntegerEnum(_) | Attr::NumberEnum(_) => "enum",
            Attr::IntegerMinimum(_) | Attr::NumberMinimum(_) => "minimum",
            Attr::IntegerMaximum(_) | Attr::NumberMaximum(_) => "maximum",
        }
    }

    /// Parse `key=value` for a schema of `kind`. The kind decides the element
    /// type of `enum` and the numeric type of `minimum`/`maximum`; lists are
    /// comma separated and each entry is trimmed. Numbers must be finite.
    ///
    /// Children can only be bare kinds here: `items=string`,
    /// `subschemas=integer,null`, `properties=id:integer:required,nick:string`.
    pub fn parse(kind: Kind, text: &str) -> Result<Self, SchemaError> {
        let (key, raw) = text.split_once('=').ok_or_else(|| SchemaError::InvalidValue {
            attribute: "attribute",
            value: text.to_string(),
            reason: "expected key=value".into(),
        })?;
        let mismatch = |attribute| SchemaError::KindMismatch { attribute, kind };
        let attr = match key.trim() {
            "title" => Attr::Title(raw.to_string()),
            "description" => Attr::Description(raw.to_string()),
            "properties" => Attr::Properties(
                raw.split(',').map(property).collect::<Result<Vec<_>, _>>()?,
            ),
            "subschemas" => Attr::Subschemas(
                raw.split(',')
                    .map(|k| k.trim().parse::<Kind>().map(Schema::empty))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            "items" => Attr::Items(Box::new(Schema::empty(raw.trim().parse()?))),
            "minItems" => Attr::MinItems(scalar("minItems", raw)?),
            "maxItems" => Attr::MaxItems(scalar("maxItems", raw)?),
            "minLength" => Attr::MinLength(scalar("minLength", raw)?),
            "maxLength" => Attr::MaxLength(scalar("maxLength", raw)?),
            "pattern" => Attr::Pattern(raw.to_string()),
            "format" => Attr::Format(raw.trim().parse()?),
            "enum" => match kind {
                Kind::String => Attr::StringEnum(raw.split(',').map(|x| x.trim().to_string()).collect()),
                Kind::Integer => Attr::IntegerEnum(list("enum", raw)?),
                Kind::Number => Attr::NumberEnum(finite_list("enum", raw)?),
                _ => return Err(mismatch("enum")),
            },
            "minimum" => match kind {
                Kind::Integer => Attr::IntegerMinimum(scalar("minimum", raw)?),
                Kind::Number => Attr::NumberMinimum(finite("minimum", raw)?),
                _ => return Err(mismatch("minimum")),
            },
            "maximum" => match kind {
                Kind::Integer => Attr::IntegerMaximum(scalar("maximum", raw)?),
                Kind::Number => Attr::NumberMaximum(finite("maximum", raw)?),
                _ => return Err(mismatch("maximum")),
            },
            other => return Err(SchemaError::UnknownAttribute(other.to_string())),
        };
        Ok(attr)
    }

    /// Set this attribute on `schema`, or report that its kind does not
    /// accept it. Patterns must compile as regexes.
    pub fn apply(self, schema: Schema) -> Result<Schema, SchemaError> {
        trace!(attribute = self.name(), kind = %schema.kind(), "applying attribute");
        let out = match (self, schema) {
            (Attr::Title(t), s) => annotate(s, c::title(t)),
            (Attr::Description(d), s) => annotate(s, c::description(d)),

            (Attr::Properties(ps), Schema::Object(o)) => Schema::Object(c::properties(ps).apply(o)),

            (Attr::Subschemas(xs), Schema::OneOf(m)) => Schema::OneOf(Composition { subschemas: xs, ..m }),
            (Attr::Subschemas(xs), Schema::AllOf(m)) => Schema::AllOf(Composition { subschemas: xs, ..m }),
            (Attr::Subschemas(xs), Schema::AnyOf(m)) => Schema::AnyOf(Composition { subschemas: xs, ..m }),

            (Attr::Items(i), Schema::Array(a)) => Schema::Array(c::items(*i).apply(a)),
            (Attr::MinItems(n), Schema::Array(a)) => Schema::Array(c::min_items(n).apply(a)),
            (Attr::MaxItems(n), Schema::Array(a)) => Schema::Array(c::max_items(n).apply(a)),

            (Attr::MinLength(n), Schema::String(s)) => Schema::String(c::min_length(n).apply(s)),
            (Attr::MaxLength(n), Schema::String(s)) => Schema::String(c::max_length(n).apply(s)),
            (Attr::Pattern(p), Schema::String(s)) => {
                Regex::new(&p)?;
                Schema::String(c::pattern(p).apply(s))
            }
            (Attr::Format(f), Schema::String(s)) => Schema::String(c::format(f).apply(s)),
            (Attr::StringEnum(xs), Schema::String(s)) => Schema::String(c::enum_values(xs).apply(s)),

            (Attr::IntegerMinimum(n), Schema::Integer(i)) => Schema::Integer(c::minimum(n).apply(i)),
            (Attr::IntegerMaximum(n), Schema::Integer(i)) => Schema::Integer(c::maximum(n).apply(i)),
            (Attr::IntegerEnum(xs), Schema::Integer(i)) => Schema::Integer(c::enum_values(xs).apply(i)),

            (Attr::NumberMinimum(x), Schema::Number(n)) => Schema::Number(c::minimum(x).apply(n)),
            (Attr::NumberMaximum(x), Schema::Number(n)) => Schema::Number(c::maximum(x).apply(n)),
            (Attr::NumberEnum(xs), Schema::Number(n)) => Schema::Number(c::enum_values(xs).apply(n)),

            (attr, s) => {
                return Err(SchemaError::KindMismatch { attribute: attr.name(), kind: s.kind() });
            }
        };
        Ok(out)
    }
}

/// Fold `attrs` over an empty node of `kind`, in order. Stops at the first
/// attribute the kind rejects.
pub fn build(kind: Kind, attrs: impl IntoIterator<Item = Attr>) -> Result<Schema, SchemaError> {
    attrs
        .into_iter()
        .try_fold(Schema::empty(kind), |schema, attr| attr.apply(schema))
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn annotate(mut schema: Schema, m: Modifier<Annotations>) -> Schema {
    let meta = std::mem::take(schema.annotations_mut());
    *schema.annotations_mut() = m.apply(meta);
    schema
}

/// `name:kind` or `name:kind:required`.
fn property(raw: &str) -> Result<Property, SchemaError> {
    let invalid = |reason: &str| SchemaError::InvalidValue {
        attribute: "properties",
        value: raw.to_string(),
        reason: reason.to_string(),
    };
    let mut parts = raw.trim().split(':');
    let name = parts.next().filter(|n| !n.is_empty()).ok_or_else(|| invalid("missing property name"))?;
    let kind: Kind = parts.next().ok_or_else(|| invalid("missing property kind"))?.parse()?;
    let required = match parts.next() {
        None => false,
        Some("required") => true,
        Some(_) => return Err(invalid("expected `required` after the kind")),
    };
    if parts.next().is_some() {
        return Err(invalid("too many `:` separated parts"));
    }
    Ok(Property { name: name.to_string(), schema: Schema::empty(kind), required })
}

fn scalar<T>(attribute: &'static str, raw: &str) -> Result<T, SchemaError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse::<T>().map_err(|e| SchemaError::InvalidValue {
        attribute,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn list<T>(attribute: &'static str, raw: &str) -> Result<Vec<T>, SchemaError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.split(',').map(|x| scalar(attribute, x)).collect()
}

// `f64::from_str` accepts `inf` and `NaN`, which have no JSON form.
fn finite(attribute: &'static str, raw: &str) -> Result<f64, SchemaError> {
    let x: f64 = scalar(attribute, raw)?;
    if x.is_finite() {
        Ok(x)
    } else {
        Err(SchemaError::InvalidValue {
            attribute,
            value: raw.to_string(),
            reason: "must be finite".into(),
        })
    }
}

fn finite_list(attribute: &'static str, raw: &str) -> Result<Vec<f64>, SchemaError> {
    raw.split(',').map(|x| finite(attribute, x)).collect()
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinators::*;
    use crate::encode::encode;
    use serde_json::json;

    fn parse_all(kind: Kind, xs: &[&str]) -> Vec<Attr> {
        xs.iter().map(|x| Attr::parse(kind, x).unwrap()).collect()
    }

    #[test]
    fn dynamic_build_matches_typed_build() {
        let attrs = parse_all(Kind::String, &[
            "title=Code", "minLength=2", "maxLength=8", "pattern=^foo$", "format=date-time",
        ]);
        let dynamic = build(Kind::String, attrs).unwrap();
        let typed = string([
            title("Code"),
            min_length(2),
            max_length(8),
            pattern("^foo$"),
            format(Format::DateTime),
        ]);
        assert_eq!(dynamic, typed);
    }

    #[test]
    fn enum_and_bounds_follow_kind() {
        let i = build(Kind::Integer, parse_all(Kind::Integer, &["enum=1,2", "minimum=0"])).unwrap();
        assert_eq!(encode(&i), json!({ "type": "integer", "enum": [1, 2], "minimum": 0 }));

        let n = build(Kind::Number, parse_all(Kind::Number, &["enum=1.2,3.4", "maximum=2"])).unwrap();
        let v = encode(&n);
        assert_eq!(v["enum"], json!([1.2, 3.4]));
        assert!(v["maximum"].is_f64());

        let s = build(Kind::String, parse_all(Kind::String, &["enum=a,b"])).unwrap();
        assert_eq!(encode(&s)["enum"], json!(["a", "b"]));
    }

    #[test]
    fn mismatch_names_attribute_and_kind() {
        let err = Attr::Pattern("^x$".into()).apply(integer([])).unwrap_err();
        assert!(matches!(err, SchemaError::KindMismatch { attribute: "pattern", kind: Kind::Integer }));
        assert_eq!(err.to_string(), "`pattern` is not valid on a schema of kind `integer`");

        let err = Attr::Subschemas(Vec::new()).apply(string([])).unwrap_err();
        assert_eq!(err.to_string(), "`subschemas` is not valid on a schema of kind `string`");

        let err = Attr::parse(Kind::Boolean, "enum=a").unwrap_err();
        assert!(matches!(err, SchemaError::KindMismatch { attribute: "enum", kind: Kind::Boolean }));

        let err = build(Kind::Array, [Attr::MinLength(1)]).unwrap_err();
        assert!(matches!(err, SchemaError::KindMismatch { attribute: "minLength", kind: Kind::Array }));
    }

    #[test]
    fn annotations_apply_to_every_kind() {
        for kind in Kind::ALL {
            let s = build(kind, [Attr::Title("t".into()), Attr::Description("d".into())]).unwrap();
            assert_eq!(s.kind(), kind);
            assert_eq!(s.title(), Some("t"));
            assert_eq!(s.description(), Some("d"));
        }
    }

    #[test]
    fn items_and_properties_take_children() {
        let a = build(Kind::Array, parse_all(Kind::Array, &["items=string", "minItems=1"])).unwrap();
        assert_eq!(a, array([items(string([])), min_items(1)]));

        let o = build(Kind::Object, [Attr::Properties(vec![required("id", integer([]))])]).unwrap();
        assert_eq!(encode(&o)["required"], json!(["id"]));
    }

    #[test]
    fn children_parse_as_bare_kinds() {
        let o = build(Kind::Object, parse_all(Kind::Object, &["properties=id:integer:required,nick:string"])).unwrap();
        assert_eq!(o, object([properties([
            required("id", integer([])),
            optional("nick", string([])),
        ])]));

        let u = build(Kind::AnyOf, parse_all(Kind::AnyOf, &["subschemas=integer,null"])).unwrap();
        assert_eq!(u, any_of([], [integer([]), null([])]));

        assert!(matches!(
            Attr::parse(Kind::Object, "properties=id:integer:maybe"),
            Err(SchemaError::InvalidValue { attribute: "properties", .. })
        ));
        assert!(matches!(
            build(Kind::String, parse_all(Kind::String, &["subschemas=null"])),
            Err(SchemaError::KindMismatch { attribute: "subschemas", kind: Kind::String })
        ));
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(matches!(Attr::parse(Kind::String, "minLength"), Err(SchemaError::InvalidValue { .. })));
        assert!(matches!(Attr::parse(Kind::String, "minLength=-1"), Err(SchemaError::InvalidValue { attribute: "minLength", .. })));
        assert!(matches!(Attr::parse(Kind::String, "format=datetime"), Err(SchemaError::UnknownFormat(_))));
        assert!(matches!(Attr::parse(Kind::String, "colour=red"), Err(SchemaError::UnknownAttribute(_))));
        assert!(matches!(Attr::parse(Kind::Array, "items=tuple"), Err(SchemaError::UnknownKind(_))));
        assert!(matches!(
            build(Kind::String, [Attr::Pattern("(unclosed".into())]),
            Err(SchemaError::InvalidPattern(_))
        ));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        for text in ["minimum=inf", "maximum=-inf", "enum=NaN,1.5", "enum=1.5,infinity"] {
            let err = Attr::parse(Kind::Number, text).unwrap_err();
            assert!(
                matches!(err, SchemaError::InvalidValue { ref reason, .. } if reason == "must be finite"),
                "{text}: {err}"
            );
        }
        let n = build(Kind::Number, parse_all(Kind::Number, &["minimum=-2.5", "enum=0.5,1e3"])).unwrap();
        assert_eq!(encode(&n), json!({ "type": "number", "minimum": -2.5, "enum": [0.5, 1000.0] }));
    }

    #[test]
    fn list_entries_are_trimmed_for_every_kind() {
        let s = build(Kind::String, parse_all(Kind::String, &["enum=a, b ,c"])).unwrap();
        assert_eq!(encode(&s)["enum"], json!(["a", "b", "c"]));
        let i = build(Kind::Integer, parse_all(Kind::Integer, &["enum=1, 2"])).unwrap();
        assert_eq!(encode(&i)["enum"], json!([1, 2]));
    }

    #[test]
    fn later_attribute_wins() {
        let s = build(Kind::Integer, parse_all(Kind::Integer, &["maximum=3", "maximum=9"])).unwrap();
        assert_eq!(encode(&s)["maximum"], 9);
    }
}
