use serde_json::{Map, Value};

/// A sky document: an untyped JSON tree, migrated in place.
pub type Document = Value;

/// Returns the document's `schemaVersion` when it is a number.
pub fn schema_version(doc: &Document) -> Option<f64> {
    doc.get("schemaVersion").and_then(Value::as_f64)
}

/// Whether the document carries a `schemaVersion` key at all.
pub fn has_schema_version(doc: &Document) -> bool {
    doc.get("schemaVersion").is_some()
}

/// Mutable access to `doc[key]` when it is an object.
pub fn object_mut<'a>(doc: &'a mut Value, key: &str) -> Option<&'a mut Map<String, Value>> {
    doc.get_mut(key).and_then(Value::as_object_mut)
}

/// Shared access to `doc[key]` when it is an object.
pub fn object<'a>(doc: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    doc.get(key).and_then(Value::as_object)
}

/// Moves `map[from]` to `map[to]`. Returns whether anything moved.
pub fn rename_key(map: &mut Map<String, Value>, from: &str, to: &str) -> bool {
    match map.remove(from) {
        Some(v) => {
            map.insert(to.to_owned(), v);
            true
        }
        None => false,
    }
}

/// Reads an optional number.
///
/// A present value that is not a number is treated as absent and logged, so callers fall
/// back to their default instead of failing the document.
pub fn number(map: &Map<String, Value>, key: &str) -> Option<f64> {
    match map.get(key)? {
        Value::Null => None,
        v => {
            let n = v.as_f64();
            if n.is_none() {
                tracing::warn!(key, value = %v, "expected a number, ignoring value");
            }
            n
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/json.rs"]
mod tests;
