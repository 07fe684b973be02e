//! Schema → JSON Schema document.
//!
//! Unset attributes are left out entirely (no `null` placeholders). Key order
//! in the emitted objects follows insertion, which `serde_json`'s
//! `preserve_order` feature keeps, so `properties` come out in declaration
//! order.
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::schema::{
    Annotations, ArraySchema, Composition, IntegerSchema, NumberSchema, ObjectSchema, Schema,
    StringSchema,
};

pub fn encode(schema: &Schema) -> Value {
    let mut o = Map::new();
    emit_annotations(&mut o, schema.annotations());
    if let Some(ty) = schema.kind().type_name() {
        o.insert("type".into(), Value::from(ty));
    }
    match schema {
        Schema::Object(x)  => emit_object(&mut o, x),
        Schema::Array(x)   => emit_array(&mut o, x),
        Schema::String(x)  => emit_string(&mut o, x),
        Schema::Integer(x) => emit_integer(&mut o, x),
        Schema::Number(x)  => emit_number(&mut o, x),
        Schema::Boolean(_) | Schema::Null(_) => {}
        Schema::OneOf(c) | Schema::AllOf(c) | Schema::AnyOf(c) => {
            emit_composition(&mut o, schema.kind().as_str(), c)
        }
    }
    Value::Object(o)
}

pub fn to_json_string(schema: &Schema) -> Result<String, SchemaError> {
    Ok(serde_json::to_string(&encode(schema))?)
}

pub fn to_json_string_pretty(schema: &Schema) -> Result<String, SchemaError> {
    Ok(serde_json::to_string_pretty(&encode(schema))?)
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode(self).serialize(serializer)
    }
}

// ------------------------------- per kind --------------------------------- //

fn emit_annotations(o: &mut Map<String, Value>, meta: &Annotations) {
    if let Some(t) = &meta.title {
        o.insert("title".into(), Value::from(t.as_str()));
    }
    if let Some(d) = &meta.description {
        o.insert("description".into(), Value::from(d.as_str()));
    }
}

fn emit_object(o: &mut Map<String, Value>, x: &ObjectSchema) {
    if !x.properties.is_empty() {
        let props: Map<String, Value> = x.properties
            .iter()
            .map(|p| (p.name.clone(), encode(&p.schema)))
            .collect();
        o.insert("properties".into(), Value::Object(props));
    }
    let required: Vec<Value> = x.required().map(Value::from).collect();
    if !required.is_empty() {
        o.insert("required".into(), Value::Array(required));
    }
}

fn emit_array(o: &mut Map<String, Value>, x: &ArraySchema) {
    if let Some(item) = &x.items {
        o.insert("items".into(), encode(item));
    }
    if let Some(n) = x.min_items { o.insert("minItems".into(), Value::from(n)); }
    if let Some(n) = x.max_items { o.insert("maxItems".into(), Value::from(n)); }
}

fn emit_string(o: &mut Map<String, Value>, x: &StringSchema) {
    if let Some(n) = x.min_length { o.insert("minLength".into(), Value::from(n)); }
    if let Some(n) = x.max_length { o.insert("maxLength".into(), Value::from(n)); }
    if let Some(rx) = &x.pattern {
        o.insert("pattern".into(), Value::from(rx.as_str()));
    }
    if let Some(f) = x.format {
        o.insert("format".into(), Value::from(f.as_str()));
    }
    if let Some(xs) = &x.enum_values {
        o.insert("enum".into(), xs.iter().map(String::as_str).collect());
    }
}

fn emit_integer(o: &mut Map<String, Value>, x: &IntegerSchema) {
    if let Some(m) = x.minimum { o.insert("minimum".into(), Value::from(m)); }
    if let Some(m) = x.maximum { o.insert("maximum".into(), Value::from(m)); }
    if let Some(xs) = &x.enum_values {
        o.insert("enum".into(), xs.iter().copied().collect());
    }
}

// `Value::from(f64)` always yields a float number (2.0 stays 2.0); NaN and
// infinities have no JSON form and become null.
fn emit_number(o: &mut Map<String, Value>, x: &NumberSchema) {
    if let Some(m) = x.minimum { o.insert("minimum".into(), Value::from(m)); }
    if let Some(m) = x.maximum { o.insert("maximum".into(), Value::from(m)); }
    if let Some(xs) = &x.enum_values {
        o.insert("enum".into(), xs.iter().copied().collect());
    }
}

fn emit_composition(o: &mut Map<String, Value>, key: &str, c: &Composition) {
    o.insert(key.into(), Value::Array(c.subschemas.iter().map(encode).collect()));
}

// ------------------------------- Tests ------------------------------------ //
