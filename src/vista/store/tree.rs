//! In-process operations on a JSON document shaped like the realtime database.
//!
//! Both the memory and the file backend keep the whole tree as one
//! [`serde_json::Value`] and delegate here, so they share the database's
//! rules: `null` and empty objects are never stored, and removing the last
//! child of a node removes the node.

use super::path::NodePath;
use crate::error::Result;
use serde_json::{Map, Value};

pub fn empty() -> Value {
    Value::Object(Map::new())
}

pub fn is_empty_node(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Strip nulls and empty objects, recursively.
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize(v)))
                .filter(|(_, v)| !is_empty_node(v))
                .collect(),
        ),
        other => other,
    }
}

pub fn get<'a>(root: &'a Value, path: &NodePath) -> Option<&'a Value> {
    let mut node = root;
    for segment in path.segments() {
        node = node.as_object()?.get(segment)?;
    }
    if is_empty_node(node) {
        None
    } else {
        Some(node)
    }
}

pub fn set(root: &mut Value, path: &NodePath, value: Value) {
    let value = normalize(value);
    if is_empty_node(&value) {
        remove(root, path);
        return;
    }
    let Some((last, parents)) = path.segments().split_last() else {
        *root = value;
        return;
    };
    let mut node = root;
    for segment in parents {
        node = object_entry(node, segment);
    }
    ensure_object(node).insert(last.clone(), value);
}

/// Shallow-merge `fields` into the node at `path`; `null` fields are removed.
pub fn update(root: &mut Value, path: &NodePath, fields: &Map<String, Value>) -> Result<()> {
    let children = fields
        .iter()
        .map(|(key, value)| Ok((path.child(key)?, value)))
        .collect::<Result<Vec<_>>>()?;
    for (child, value) in children {
        set(root, &child, value.clone());
    }
    Ok(())
}

pub fn remove(root: &mut Value, path: &NodePath) {
    if path.is_root() {
        *root = empty();
        return;
    }
    remove_recursive(root, path.segments());
}

/// Children of `node` whose `field` is the string `expected`.
///
/// Matches what an indexed `equalTo="..."` query returns: a numeric
/// `workspaceId: 7` is not the string `"7"`.
pub fn filter_children(node: Option<&Value>, field: &str, expected: &str) -> Map<String, Value> {
    let Some(Value::Object(children)) = node else {
        return Map::new();
    };
    children
        .iter()
        .filter(|(_, child)| child.get(field).and_then(Value::as_str) == Some(expected))
        .map(|(key, child)| (key.clone(), child.clone()))
        .collect()
}

pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = empty();
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced by an object"),
    }
}

fn object_entry<'a>(node: &'a mut Value, key: &str) -> &'a mut Value {
    ensure_object(node)
        .entry(key.to_string())
        .or_insert_with(empty)
}

/// Returns true when `node` became empty and should be pruned by its parent.
fn remove_recursive(node: &mut Value, segments: &[String]) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return true;
    };
    let Value::Object(map) = node else {
        return false;
    };
    if rest.is_empty() {
        map.remove(first);
    } else if let Some(child) = map.get_mut(first) {
        if remove_recursive(child, rest) {
            map.remove(first);
        }
    }
    map.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(p: &str) -> NodePath {
        NodePath::parse(p).unwrap()
    }

    #[test]
    fn set_creates_intermediate_nodes() {
        let mut root = empty();
        set(&mut root, &path("projects/u1/p1"), json!({"name": "Site"}));
        assert_eq!(root, json!({"projects": {"u1": {"p1": {"name": "Site"}}}}));
    }

    #[test]
    fn set_null_removes() {
        let mut root = json!({"tasks": {"t1": {"status": "pending"}}});
        set(&mut root, &path("tasks/t1"), Value::Null);
        assert_eq!(root, json!({}));
    }

    #[test]
    fn remove_prunes_empty_ancestors() {
        let mut root = json!({"projects": {"u1": {"p1": {"name": "A"}}, "u2": {"p2": {"name": "B"}}}});
        remove(&mut root, &path("projects/u1/p1"));
        assert_eq!(root, json!({"projects": {"u2": {"p2": {"name": "B"}}}}));
    }

    #[test]
    fn remove_missing_path_is_noop() {
        let mut root = json!({"users": {"u1": {"name": "A"}}});
        remove(&mut root, &path("users/u9"));
        remove(&mut root, &path("nothing/here/at/all"));
        assert_eq!(root, json!({"users": {"u1": {"name": "A"}}}));
    }

    #[test]
    fn update_merges_and_drops_nulls() {
        let mut root = json!({"tasks": {"t1": {"status": "pending", "name": "Ship", "old": 1}}});
        let fields = json!({"status": "completed", "old": null});
        update(&mut root, &path("tasks/t1"), fields.as_object().unwrap()).unwrap();
        assert_eq!(root, json!({"tasks": {"t1": {"status": "completed", "name": "Ship"}}}));
    }

    #[test]
    fn update_rejects_invalid_keys_without_writing() {
        let mut root = json!({"tasks": {"t1": {"status": "pending"}}});
        let fields = json!({"status": "completed", "bad.key": 1});
        assert!(update(&mut root, &path("tasks/t1"), fields.as_object().unwrap()).is_err());
        assert_eq!(root, json!({"tasks": {"t1": {"status": "pending"}}}));
    }

    #[test]
    fn get_treats_empty_as_absent() {
        let root = json!({"workspaces": {}});
        assert!(get(&root, &path("workspaces")).is_none());
        assert!(get(&root, &path("missing")).is_none());
        assert!(get(&empty(), &NodePath::root()).is_none());
    }

    #[test]
    fn filter_matches_string_values_only() {
        let node = json!({
            "a": {"workspaceId": "A"},
            "b": {"workspaceId": "B"},
            "c": {"workspaceId": "A"},
            "d": {"workspaceId": 7},
            "e": "leaf"
        });
        let matched = filter_children(Some(&node), "workspaceId", "A");
        assert_eq!(matched.len(), 2);
        assert!(matched.contains_key("a") && matched.contains_key("c"));
        assert!(filter_children(Some(&node), "workspaceId", "7").is_empty());
        assert!(filter_children(None, "workspaceId", "A").is_empty());
    }
}
