//! Fixture runner: builds a catalog of schemas, encodes them, and checks the
//! emitted documents by decoding JSON paths into typed values.
mod path_de;

use anyhow::bail;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use json_schema_dsl::*;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Every keyword the encoder may emit. Decoding a document into this with
/// `deny_unknown_fields` catches stray keys and wrongly typed values.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(dead_code)]
struct SchemaDoc {
    #[serde(rename = "type")]
    ty: Option<String>,
    title: Option<String>,
    description: Option<String>,
    properties: Option<serde_json::Map<String, Value>>,
    required: Option<Vec<String>>,
    items: Option<Box<SchemaDoc>>,
    min_items: Option<u64>,
    max_items: Option<u64>,
    min_length: Option<u64>,
    max_length: Option<u64>,
    pattern: Option<String>,
    format: Option<String>,
    #[serde(rename = "enum")]
    enum_: Option<Vec<Value>>,
    minimum: Option<Value>,
    maximum: Option<Value>,
    one_of: Option<Vec<SchemaDoc>>,
    all_of: Option<Vec<SchemaDoc>>,
    any_of: Option<Vec<SchemaDoc>>,
}

type Check = Box<dyn Fn(&Value) -> Result<(), String>>;

struct Case {
    name: &'static str,
    schema: Schema,
    checks: Vec<Check>,
}

// ————————————————————————————————————————————————————————————————————————————
// CHECKS
// ————————————————————————————————————————————————————————————————————————————

fn eq<T>(pointer: &'static str, expected: T) -> Check
where
    T: DeserializeOwned + PartialEq + std::fmt::Debug + 'static,
{
    Box::new(move |doc| {
        let got: T = path_de::decode_at(doc, pointer)?;
        if got == expected {
            Ok(())
        } else {
            Err(format!("{pointer}: expected {expected:?}, got {got:?}"))
        }
    })
}

fn absent(pointer: &'static str) -> Check {
    Box::new(move |doc| match doc.pointer(pointer) {
        None => Ok(()),
        Some(v) => Err(format!("{pointer}: expected no value, got {v}")),
    })
}

fn is_float(pointer: &'static str) -> Check {
    Box::new(move |doc| match doc.pointer(pointer) {
        Some(v) if v.is_f64() => Ok(()),
        other => Err(format!("{pointer}: expected a float, got {other:?}")),
    })
}

fn is_int(pointer: &'static str) -> Check {
    Box::new(move |doc| match doc.pointer(pointer) {
        Some(v) if v.is_i64() || v.is_u64() => Ok(()),
        other => Err(format!("{pointer}: expected an integer, got {other:?}")),
    })
}

// ————————————————————————————————————————————————————————————————————————————
// CATALOG
// ————————————————————————————————————————————————————————————————————————————

fn catalog() -> Vec<Case> {
    vec![
        Case {
            name: "object with mixed requiredness",
            schema: object([
                title("Pair"),
                properties([optional("a", integer([])), required("b", string([]))]),
            ]),
            checks: vec![
                eq("/type", "object".to_string()),
                eq("/title", "Pair".to_string()),
                eq("/properties/a/type", "integer".to_string()),
                eq("/properties/b/type", "string".to_string()),
                eq("/required", vec!["b".to_string()]),
                absent("/description"),
            ],
        },
        Case {
            name: "object without required properties",
            schema: object([properties([optional("a", boolean([]))])]),
            checks: vec![absent("/required"), eq("/properties/a/type", "boolean".to_string())],
        },
        Case {
            name: "bounded array of strings",
            schema: array([items(string([])), min_items(3), max_items(6)]),
            checks: vec![
                eq("/type", "array".to_string()),
                eq("/items/type", "string".to_string()),
                eq("/minItems", 3u64),
                eq("/maxItems", 6u64),
            ],
        },
        Case {
            name: "constrained string",
            schema: string([min_length(2), max_length(8), pattern("^foo$"), format(Format::DateTime)]),
            checks: vec![
                eq("/minLength", 2u64),
                eq("/maxLength", 8u64),
                eq("/pattern", "^foo$".to_string()),
                eq("/format", "date-time".to_string()),
            ],
        },
        Case {
            name: "string enum",
            schema: string([enum_values(["a", "b"])]),
            checks: vec![eq("/enum", vec!["a".to_string(), "b".to_string()])],
        },
        Case {
            name: "integer enum and bounds",
            schema: integer([enum_values([1, 2]), minimum(0), maximum(5)]),
            checks: vec![
                eq("/type", "integer".to_string()),
                eq("/enum", vec![1i64, 2]),
                is_int("/enum/0"),
                is_int("/minimum"),
                is_int("/maximum"),
            ],
        },
        Case {
            name: "number enum and bounds",
            schema: number([enum_values([1.2, 3.4]), minimum(2.0), maximum(2.5)]),
            checks: vec![
                eq("/enum", vec![1.2f64, 3.4]),
                eq("/maximum", 2.5f64),
                is_float("/minimum"),
                is_float("/enum/0"),
            ],
        },
        Case {
            name: "oneOf keeps order",
            schema: one_of([], [integer([]), string([])]),
            checks: vec![
                absent("/type"),
                eq("/oneOf/0/type", "integer".to_string()),
                eq("/oneOf/1/type", "string".to_string()),
            ],
        },
        Case {
            name: "allOf keeps order",
            schema: all_of([title("Both")], [integer([]), string([])]),
            checks: vec![
                absent("/type"),
                eq("/title", "Both".to_string()),
                eq("/allOf/0/type", "integer".to_string()),
                eq("/allOf/1/type", "string".to_string()),
            ],
        },
        Case {
            name: "anyOf keeps order",
            schema: any_of([], [integer([]), string([])]),
            checks: vec![
                absent("/type"),
                eq("/anyOf/0/type", "integer".to_string()),
                eq("/anyOf/1/type", "string".to_string()),
            ],
        },
        Case {
            name: "annotated boolean and null",
            schema: object([properties([
                required("flag", boolean([title("Flag")])),
                optional("gone", null([description("always null")])),
            ])]),
            checks: vec![
                eq("/properties/flag/title", "Flag".to_string()),
                eq("/properties/gone/type", "null".to_string()),
                eq("/properties/gone/description", "always null".to_string()),
                eq("/required", vec!["flag".to_string()]),
            ],
        },
        Case {
            name: "nested tree",
            schema: object([properties([required(
                "events",
                array([items(any_of([], [
                    object([properties([required("at", string([format(Format::DateTime)]))])]),
                    null([]),
                ]))]),
            )])]),
            checks: vec![
                eq("/properties/events/items/anyOf/0/properties/at/format", "date-time".to_string()),
                eq("/properties/events/items/anyOf/0/required", vec!["at".to_string()]),
                eq("/properties/events/items/anyOf/1/type", "null".to_string()),
            ],
        },
    ]
}

// ————————————————————————————————————————————————————————————————————————————
// RUNNER
// ————————————————————————————————————————————————————————————————————————————

/// Run one case; returns every failure message.
fn run_case(case: &Case) -> Vec<String> {
    let doc = encode(&case.schema);
    let mut failures = Vec::new();

    let src = doc.to_string();
    if let Err(error) = path_de::from_str_with_path::<SchemaDoc>(&src) {
        failures.push(format!("document shape: {error}"));
    }
    if encode(&case.schema) != doc {
        failures.push("encoding is not deterministic".to_string());
    }
    for check in &case.checks {
        if let Err(error) = check(&doc) {
            failures.push(error);
        }
    }
    failures
}

fn main() -> anyhow::Result<()> {
    let cases = catalog();
    let mut failed = 0usize;
    for case in &cases {
        let failures = run_case(case);
        if failures.is_empty() {
            eprintln!("✅ {}", case.name);
        } else {
            failed += 1;
            eprintln!("❌ {}", case.name);
            for f in failures {
                eprintln!("   {f}");
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} cases failed", cases.len());
    }
    eprintln!("—— {} cases passed ——", cases.len());
    Ok(())
}
