//! Turning stored collections into lists of records.
//!
//! A collection node is a map of generated key to record. Normalizing it yields
//! one [`Record`] per child with the key injected as `id`. An absent collection
//! normalizes to an empty list; absence of data is never a failure.

use crate::model::{Entity, Record, Timestamped};
use serde_json::Value;
use std::cmp::Ordering;

/// `collection/{id}` → one record per child.
pub fn normalize_collection(node: Option<Value>) -> Vec<Record> {
    match node {
        Some(Value::Object(children)) => children
            .into_iter()
            .map(|(key, value)| Record::new(key, value))
            .collect(),
        _ => Vec::new(),
    }
}

/// `collection/{parentId}/{id}` → one flat list, each record also carrying
/// the parent key as `parent_field`. The path wins over a stored field of the
/// same name.
pub fn normalize_nested(node: Option<Value>, parent_field: &str) -> Vec<Record> {
    let Some(Value::Object(groups)) = node else {
        return Vec::new();
    };
    let mut records = Vec::new();
    for (parent_key, group) in groups {
        for mut record in normalize_collection(Some(group)) {
            record
                .fields
                .insert(parent_field.to_string(), Value::String(parent_key.clone()));
            records.push(record);
        }
    }
    records
}

pub fn entities<T: Entity>(records: Vec<Record>) -> Vec<T> {
    records.into_iter().map(T::from_record).collect()
}

/// Newest first; records without a parseable timestamp go last, in their
/// original relative order.
pub fn sort_newest_first<T: Timestamped>(items: &mut [T]) {
    items.sort_by(|a, b| match (a.timestamp(), b.timestamp()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Project, Task};
    use serde_json::json;

    #[test]
    fn absent_collection_is_empty() {
        assert!(normalize_collection(None).is_empty());
        assert!(normalize_nested(None, "userId").is_empty());
    }

    #[test]
    fn scalar_collection_is_empty() {
        assert!(normalize_collection(Some(json!(7))).is_empty());
    }

    #[test]
    fn storage_key_becomes_id() {
        let records = normalize_collection(Some(json!({
            "k1": {"id": "stale", "name": "A"},
            "k2": {"name": "B"}
        })));
        let mut ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["k1", "k2"]);
        assert!(records.iter().all(|r| !r.fields.contains_key("id")));
    }

    #[test]
    fn nested_flattens_and_injects_parent_key() {
        let records = normalize_nested(
            Some(json!({
                "u1": {"p1": {"name": "One", "userId": "forged"}, "p2": {"name": "Two"}},
                "u2": {"p3": {"name": "Three"}}
            })),
            "userId",
        );
        let mut projects: Vec<Project> = entities(records);
        projects.sort_by(|a, b| a.id.cmp(&b.id));
        let owners: Vec<(&str, &str)> = projects
            .iter()
            .map(|p| (p.id.as_str(), p.user_id.as_str()))
            .collect();
        assert_eq!(owners, vec![("p1", "u1"), ("p2", "u1"), ("p3", "u2")]);
    }

    #[test]
    fn sorts_newest_first_with_undated_last() {
        let mut tasks: Vec<Task> = entities(normalize_collection(Some(json!({
            "old": {"createdAt": "2024-01-01T00:00:00Z"},
            "undated": {"name": "x"},
            "new": {"createdAt": "2025-06-01T12:00:00Z"},
            "millis": {"createdAt": 1717243200000i64}
        }))));
        sort_newest_first(&mut tasks);
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "millis", "old", "undated"]);
    }
}
