//! Rewrites upload placeholders in article content with resolved URLs.
//!
//! Two placeholder shapes are recognized:
//! * `{"upload_key": "<key>"}` becomes `{"url": "<resolved>"}`
//! * image blocks `{"type": "image", "data": {"file": {"fileKey": "<key>"}}}`
//!   get `data.file.url` set while keeping the key for later edits
//!
//! Everything else passes through with key order intact.

use serde_json::{Map, Value};

use crate::upload::UploadMapping;

pub fn inject_uploaded_urls(mut document: Value, mapping: &UploadMapping) -> Value {
    if !mapping.is_empty() {
        walk(&mut document, mapping);
    }
    document
}

fn walk(node: &mut Value, mapping: &UploadMapping) {
    match node {
        Value::Object(object) => {
            resolve_legacy_placeholder(object, mapping);
            resolve_image_block(object, mapping);
            for child in object.values_mut() {
                walk(child, mapping);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                walk(item, mapping);
            }
        }
        _ => {}
    }
}

fn resolve_legacy_placeholder(object: &mut Map<String, Value>, mapping: &UploadMapping) {
    let url = match object.get("upload_key") {
        Some(Value::String(key)) => match mapping.get(key) {
            Some(url) => url.clone(),
            None => return,
        },
        _ => return,
    };
    object.insert("url".to_string(), Value::String(url));
    // shift_remove keeps the remaining keys in document order
    object.shift_remove("upload_key");
}

fn resolve_image_block(object: &mut Map<String, Value>, mapping: &UploadMapping) {
    let is_image = matches!(object.get("type"), Some(Value::String(t)) if t.eq_ignore_ascii_case("image"));
    if !is_image {
        return;
    }

    let file = match object
        .get_mut("data")
        .and_then(Value::as_object_mut)
        .and_then(|data| data.get_mut("file"))
        .and_then(Value::as_object_mut)
    {
        Some(file) => file,
        None => return,
    };

    let url = match file_key(file).and_then(|key| mapping.get(key)) {
        Some(url) if !url.trim().is_empty() => url.clone(),
        _ => return,
    };
    file.insert("url".to_string(), Value::String(url));
}

/// `fileKey`, falling back to `file_key`; blank values are ignored
fn file_key(file: &Map<String, Value>) -> Option<&str> {
    ["fileKey", "file_key"]
        .iter()
        .filter_map(|name| file.get(*name).and_then(Value::as_str))
        .map(str::trim)
        .find(|key| !key.is_empty())
}
