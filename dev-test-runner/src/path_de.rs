use serde::de::DeserializeOwned;
use serde_json::Value;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(format!("at JSON path {path} → {}", err.into_inner()))
        }
    }
}

/// Decode the node at a JSON Pointer (`/properties/a/type`) into `T`.
/// Errors name the pointer and, for nested failures, the path below it.
pub fn decode_at<T: DeserializeOwned>(doc: &Value, pointer: &str) -> Result<T, String> {
    let node = doc
        .pointer(pointer)
        .ok_or_else(|| format!("nothing at {pointer}"))?;
    match serde_path_to_error::deserialize::<_, T>(node) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(format!("at {pointer} (+{path}) → {}", err.into_inner()))
        }
    }
}
