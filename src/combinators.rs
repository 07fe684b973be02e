//! Kind constructors and attribute modifiers.
//!
//! A constructor folds an ordered list of modifiers over a fresh node of its
//! kind, left to right, so a later modifier for the same attribute wins:
//!
//! ```
//! use json_schema_dsl::*;
//!
//! let schema = object([
//!     title("Person"),
//!     properties([
//!         required("name", string([min_length(1)])),
//!         optional("age", integer([minimum(0)])),
//!     ]),
//! ]);
//! assert_eq!(encode(&schema)["required"], serde_json::json!(["name"]));
//! ```
//!
//! Modifiers are typed by the attribute record they touch (`Modifier<StringSchema>`
//! and so on), so `pattern` on an integer schema does not compile.
use std::fmt;

use crate::format::Format;
use crate::schema::{
    Annotations, ArraySchema, Composition, IntegerSchema, NumberSchema, ObjectSchema, Property,
    Schema, StringSchema,
};

// ————————————————————————————————————————————————————————————————————————————
// MODIFIER
// ————————————————————————————————————————————————————————————————————————————

/// A pure `K -> K` update of one attribute of a kind's record.
pub struct Modifier<K>(Box<dyn FnOnce(K) -> K + Send + Sync>);

impl<K> Modifier<K> {
    pub fn new(f: impl FnOnce(K) -> K + Send + Sync + 'static) -> Self {
        Modifier(Box::new(f))
    }

    pub fn apply(self, target: K) -> K {
        (self.0)(target)
    }
}

impl<K> fmt::Debug for Modifier<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modifier<{}>", std::any::type_name::<K>())
    }
}

fn fold<K: Default>(modifiers: impl IntoIterator<Item = Modifier<K>>) -> K {
    fold_from(K::default(), modifiers)
}

fn fold_from<K>(base: K, modifiers: impl IntoIterator<Item = Modifier<K>>) -> K {
    modifiers
        .into_iter()
        .fold(base, |acc, m| m.apply(acc))
}

// ————————————————————————————————————————————————————————————————————————————
// CAPABILITIES
// ————————————————————————————————————————————————————————————————————————————

/// Records that carry a title and description (all of them).
pub trait Annotated: Sized + 'static {
    fn meta_mut(&mut self) -> &mut Annotations;
}

/// Records with `minimum` / `maximum`.
pub trait Bounded: Sized + 'static {
    type Value: Send + Sync + 'static;
    fn set_minimum(&mut self, value: Self::Value);
    fn set_maximum(&mut self, value: Self::Value);
}

/// Records with an `enum` list; `Value` is the kind's scalar type.
pub trait Enumerated: Sized + 'static {
    type Value: Send + Sync + 'static;
    fn set_enum(&mut self, values: Vec<Self::Value>);
}

impl Annotated for Annotations {
    fn meta_mut(&mut self) -> &mut Annotations { self }
}

macro_rules! annotated {
    ($($t:ty),*) => {$(
        impl Annotated for $t {
            fn meta_mut(&mut self) -> &mut Annotations { &mut self.meta }
        }
    )*};
}

annotated!(ObjectSchema, ArraySchema, StringSchema, IntegerSchema, NumberSchema, Composition);

impl Bounded for IntegerSchema {
    type Value = i64;
    fn set_minimum(&mut self, value: i64) { self.minimum = Some(value); }
    fn set_maximum(&mut self, value: i64) { self.maximum = Some(value); }
}

impl Bounded for NumberSchema {
    type Value = f64;
    fn set_minimum(&mut self, value: f64) { self.minimum = Some(value); }
    fn set_maximum(&mut self, value: f64) { self.maximum = Some(value); }
}

impl Enumerated for StringSchema {
    type Value = String;
    fn set_enum(&mut self, values: Vec<String>) { self.enum_values = Some(values); }
}

impl Enumerated for IntegerSchema {
    type Value = i64;
    fn set_enum(&mut self, values: Vec<i64>) { self.enum_values = Some(values); }
}

impl Enumerated for NumberSchema {
    type Value = f64;
    fn set_enum(&mut self, values: Vec<f64>) { self.enum_values = Some(values); }
}

// ————————————————————————————————————————————————————————————————————————————
// KIND CONSTRUCTORS
// ————————————————————————————————————————————————————————————————————————————

pub fn object(modifiers: impl IntoIterator<Item = Modifier<ObjectSchema>>) -> Schema {
    Schema::Object(fold(modifiers))
}

pub fn array(modifiers: impl IntoIterator<Item = Modifier<ArraySchema>>) -> Schema {
    Schema::Array(fold(modifiers))
}

pub fn string(modifiers: impl IntoIterator<Item = Modifier<StringSchema>>) -> Schema {
    Schema::String(fold(modifiers))
}

pub fn integer(modifiers: impl IntoIterator<Item = Modifier<IntegerSchema>>) -> Schema {
    Schema::Integer(fold(modifiers))
}

pub fn number(modifiers: impl IntoIterator<Item = Modifier<NumberSchema>>) -> Schema {
    Schema::Number(fold(modifiers))
}

pub fn boolean(modifiers: impl IntoIterator<Item = Modifier<Annotations>>) -> Schema {
    Schema::Boolean(fold(modifiers))
}

pub fn null(modifiers: impl IntoIterator<Item = Modifier<Annotations>>) -> Schema {
    Schema::Null(fold(modifiers))
}

fn composition(
    modifiers: impl IntoIterator<Item = Modifier<Composition>>,
    subschemas: impl IntoIterator<Item = Schema>,
) -> Composition {
    let base = Composition {
        subschemas: subschemas.into_iter().collect(),
        ..Composition::default()
    };
    fold_from(base, modifiers)
}

pub fn one_of(
    modifiers: impl IntoIterator<Item = Modifier<Composition>>,
    subschemas: impl IntoIterator<Item = Schema>,
) -> Schema {
    Schema::OneOf(composition(modifiers, subschemas))
}

pub fn all_of(
    modifiers: impl IntoIterator<Item = Modifier<Composition>>,
    subschemas: impl IntoIterator<Item = Schema>,
) -> Schema {
    Schema::AllOf(composition(modifiers, subschemas))
}

pub fn any_of(
    modifiers: impl IntoIterator<Item = Modifier<Composition>>,
    subschemas: impl IntoIterator<Item = Schema>,
) -> Schema {
    Schema::AnyOf(composition(modifiers, subschemas))
}

// ————————————————————————————————————————————————————————————————————————————
// MODIFIERS
// ————————————————————————————————————————————————————————————————————————————

// -------------------------------- any kind -------------------------------- //

pub fn title<K: Annotated>(text: impl Into<String>) -> Modifier<K> {
    let text = text.into();
    Modifier::new(move |mut k: K| {
        k.meta_mut().title = Some(text);
        k
    })
}

pub fn description<K: Annotated>(text: impl Into<String>) -> Modifier<K> {
    let text = text.into();
    Modifier::new(move |mut k: K| {
        k.meta_mut().description = Some(text);
        k
    })
}

// --------------------------------- object --------------------------------- //

/// Replaces the property list. Requiredness comes from how each entry was
/// made ([`required`] or [`optional`]).
pub fn properties(entries: impl IntoIterator<Item = Property>) -> Modifier<ObjectSchema> {
    let entries: Vec<Property> = entries.into_iter().collect();
    Modifier::new(move |o: ObjectSchema| ObjectSchema { properties: entries, ..o })
}

pub fn required(name: impl Into<String>, schema: Schema) -> Property {
    Property { name: name.into(), schema, required: true }
}

pub fn optional(name: impl Into<String>, schema: Schema) -> Property {
    Property { name: name.into(), schema, required: false }
}

// --------------------------------- array ---------------------------------- //

pub fn items(schema: Schema) -> Modifier<ArraySchema> {
    Modifier::new(move |a: ArraySchema| ArraySchema { items: Some(Box::new(schema)), ..a })
}

pub fn min_items(n: u64) -> Modifier<ArraySchema> {
    Modifier::new(move |a: ArraySchema| ArraySchema { min_items: Some(n), ..a })
}

pub fn max_items(n: u64) -> Modifier<ArraySchema> {
    Modifier::new(move |a: ArraySchema| ArraySchema { max_items: Some(n), ..a })
}

// --------------------------------- string --------------------------------- //

pub fn min_length(n: u64) -> Modifier<StringSchema> {
    Modifier::new(move |s: StringSchema| StringSchema { min_length: Some(n), ..s })
}

pub fn max_length(n: u64) -> Modifier<StringSchema> {
    Modifier::new(move |s: StringSchema| StringSchema { max_length: Some(n), ..s })
}

/// Regex text is stored as given; it is not compiled here.
pub fn pattern(regex: impl Into<String>) -> Modifier<StringSchema> {
    let regex = regex.into();
    Modifier::new(move |s: StringSchema| StringSchema { pattern: Some(regex), ..s })
}

pub fn format(format: Format) -> Modifier<StringSchema> {
    Modifier::new(move |s: StringSchema| StringSchema { format: Some(format), ..s })
}

// ---------------------------- integer / number ---------------------------- //

pub fn minimum<K: Bounded>(value: impl Into<K::Value>) -> Modifier<K> {
    let value = value.into();
    Modifier::new(move |mut k: K| {
        k.set_minimum(value);
        k
    })
}

pub fn maximum<K: Bounded>(value: impl Into<K::Value>) -> Modifier<K> {
    let value = value.into();
    Modifier::new(move |mut k: K| {
        k.set_maximum(value);
        k
    })
}

// ------------------------- string / integer / number ---------------------- //

/// The `enum` keyword. Element type follows the target kind: text for
/// strings, `i64` for integers, `f64` for numbers.
pub fn enum_values<K, I>(values: I) -> Modifier<K>
where
    K: Enumerated,
    I: IntoIterator,
    I::Item: Into<K::Value>,
{
    let values: Vec<K::Value> = values.into_iter().map(Into::into).collect();
    Modifier::new(move |mut k: K| {
        k.set_enum(values);
        k
    })
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Kind;

    #[test]
    fn constructors_produce_their_kind_with_defaults() {
        assert_eq!(object([]), Schema::empty(Kind::Object));
        assert_eq!(array([]), Schema::empty(Kind::Array));
        assert_eq!(string([]), Schema::empty(Kind::String));
        assert_eq!(integer([]), Schema::empty(Kind::Integer));
        assert_eq!(number([]), Schema::empty(Kind::Number));
        assert_eq!(boolean([]), Schema::empty(Kind::Boolean));
        assert_eq!(null([]), Schema::empty(Kind::Null));
        assert_eq!(one_of([], []), Schema::empty(Kind::OneOf));
        assert_eq!(all_of([], []), Schema::empty(Kind::AllOf));
        assert_eq!(any_of([], []), Schema::empty(Kind::AnyOf));
    }

    #[test]
    fn last_write_wins() {
        let s = string([min_length(1), title("a"), min_length(4), title("b")]);
        let Schema::String(s) = s else { panic!("expected string") };
        assert_eq!(s.min_length, Some(4));
        assert_eq!(s.meta.title.as_deref(), Some("b"));
    }

    #[test]
    fn later_properties_replace_earlier_list() {
        let o = object([
            properties([required("x", null([]))]),
            properties([optional("y", boolean([]))]),
        ]);
        let Schema::Object(o) = o else { panic!("expected object") };
        assert_eq!(o.properties.len(), 1);
        assert_eq!(o.properties[0].name, "y");
        assert_eq!(o.required().count(), 0);
    }

    #[test]
    fn unrelated_attributes_are_preserved() {
        let a = array([items(string([])), min_items(3), max_items(6), description("tags")]);
        let Schema::Array(a) = a else { panic!("expected array") };
        assert_eq!(a.items.as_deref(), Some(&string([])));
        assert_eq!(a.min_items, Some(3));
        assert_eq!(a.max_items, Some(6));
        assert_eq!(a.meta.description.as_deref(), Some("tags"));
    }

    #[test]
    fn enum_element_type_follows_kind() {
        let Schema::String(s) = string([enum_values(["a", "b"])]) else { panic!() };
        assert_eq!(s.enum_values, Some(vec!["a".to_string(), "b".to_string()]));

        let Schema::Integer(i) = integer([enum_values([1, 2])]) else { panic!() };
        assert_eq!(i.enum_values, Some(vec![1i64, 2]));

        let Schema::Number(n) = number([enum_values([1.2, 3.4])]) else { panic!() };
        assert_eq!(n.enum_values, Some(vec![1.2, 3.4]));
    }

    #[test]
    fn number_bounds_accept_integer_literals() {
        let Schema::Number(n) = number([minimum(2), maximum(2.5)]) else { panic!() };
        assert_eq!(n.minimum, Some(2.0));
        assert_eq!(n.maximum, Some(2.5));
    }

    #[test]
    fn composition_keeps_child_order_and_annotations() {
        let c = any_of([title("either")], [integer([]), string([]), null([])]);
        let Schema::AnyOf(c) = c else { panic!("expected anyOf") };
        let kinds: Vec<Kind> = c.subschemas.iter().map(Schema::kind).collect();
        assert_eq!(kinds, [Kind::Integer, Kind::String, Kind::Null]);
        assert_eq!(c.meta.title.as_deref(), Some("either"));
    }

    #[test]
    fn custom_modifier_composes_with_builtins() {
        let upper = Modifier::new(|mut s: StringSchema| {
            s.pattern = Some("^[A-Z]+$".into());
            s
        });
        let Schema::String(s) = string([upper, max_length(3)]) else { panic!() };
        assert_eq!(s.pattern.as_deref(), Some("^[A-Z]+$"));
        assert_eq!(s.max_length, Some(3));
    }

    #[test]
    fn composition_modifiers_see_the_children() {
        let append_null = Modifier::new(|mut c: Composition| {
            c.subschemas.push(null([]));
            c
        });
        let Schema::OneOf(c) = one_of([append_null, title("nullable int")], [integer([])]) else {
            panic!("expected oneOf")
        };
        let kinds: Vec<Kind> = c.subschemas.iter().map(Schema::kind).collect();
        assert_eq!(kinds, [Kind::Integer, Kind::Null]);
        assert_eq!(c.meta.title.as_deref(), Some("nullable int"));
    }

    #[test]
    fn schemas_are_thread_safe_values() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
        assert_send_sync::<Modifier<ObjectSchema>>();
    }
}
