//! Normalization of raw question JSON before typed parsing.
//!
//! The survey platform serializes "no value" inconsistently: fields that are
//! semantically a mapping or null sometimes arrive as an empty list `[]`.
//! This affects a group's `range` and `name`, individual entries of `labels`,
//! and `items[].name`. These are rewritten here so the typed model in
//! [`super::model`] can use plain `Option` and map types.

use serde_json::Value;

/// Normalize one raw question value in place.
///
/// Safe to call on already-normalized input; unknown fields are left alone.
pub fn normalize_question(value: &mut Value) {
    let Some(groups) = value.get_mut("groups").and_then(Value::as_array_mut) else {
        return;
    };
    for group in groups {
        normalize_group(group);
    }
}

fn normalize_group(group: &mut Value) {
    if let Some(range) = group.get_mut("range") {
        if is_empty_array(range) {
            *range = Value::Null;
        }
    }
    if let Some(name) = group.get_mut("name") {
        if is_empty_array(name) {
            *name = Value::Object(Default::default());
        }
    }
    if let Some(labels) = group.get_mut("labels").and_then(Value::as_array_mut) {
        for label in labels {
            if is_empty_array(label) {
                *label = Value::Object(Default::default());
            }
        }
    }
    if let Some(items) = group.get_mut("items").and_then(Value::as_array_mut) {
        for item in items {
            if let Some(name) = item.get_mut("name") {
                if is_empty_array(name) {
                    *name = Value::Object(Default::default());
                }
            }
        }
    }
}

fn is_empty_array(value: &Value) -> bool {
    value.as_array().map(|a| a.is_empty()).unwrap_or(false)
}
