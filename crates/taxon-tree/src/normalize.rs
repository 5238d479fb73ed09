//! Upgrading legacy taxonomy documents to the current node schema.

use serde_json::{json, Map, Value};

/// Normalize a node and all of its descendants in place.
///
/// A plain-string `name` becomes `{"en": name}`, and absent `description`,
/// `tags` and `links` fields get their defaults. Everything else is left as
/// it was. Non-object values are ignored.
pub fn normalize(value: &mut Value) -> usize {
    let Value::Object(node) = value else {
        return 0;
    };
    let mut changed = normalize_fields(node);

    if let Some(Value::Array(children)) = node.get_mut("children") {
        for child in children {
            changed += normalize(child);
        }
    }
    changed
}

fn normalize_fields(node: &mut Map<String, Value>) -> usize {
    let mut changed = 0;

    if let Some(Value::String(name)) = node.get("name") {
        let localized = json!({ "en": name });
        node.insert("name".into(), localized);
        changed += 1;
    }

    for (key, default) in [
        ("description", json!("")),
        ("tags", json!([])),
        ("links", json!({"Link": ""})),
    ] {
        if !node.contains_key(key) {
            node.insert(key.into(), default);
            changed += 1;
        }
    }

    changed
}
