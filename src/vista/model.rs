//! Typed views over the records stored in the database tree.
//!
//! Stored records are loose: fields go missing, a `userId` arrives as a number,
//! a comment list comes back as a map. Every entity is therefore built from a
//! [`Record`] by hand instead of through `Deserialize`, so a malformed field
//! degrades to `None` (or an empty list) rather than failing the whole read.
//! Fields the console does not know about are kept in `extra` and written back
//! out untouched when the entity is serialized.

use crate::store::tree::scalar_string;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A stored node with its storage key injected as `id`.
///
/// The key always wins: a stored field called `id` is discarded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<String>, value: Value) -> Self {
        let mut fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        fields.remove("id");
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn get_str(&self, field: &str) -> Option<String> {
        self.fields.get(field).and_then(scalar_string)
    }
}

/// Anything that can be read back out of a normalized [`Record`].
pub trait Entity: Sized {
    fn from_record(record: Record) -> Self;
}

/// Records that carry a creation or upload time.
pub trait Timestamped {
    fn timestamp(&self) -> Option<DateTime<Utc>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Completed,
        TaskStatus::InProgress,
        TaskStatus::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// First word of the name; falls back to the id for nameless users.
    pub fn first_name(&self) -> String {
        self.name
            .as_deref()
            .and_then(|n| n.split_whitespace().next())
            .unwrap_or(&self.id)
            .to_string()
    }
}

impl Entity for User {
    fn from_record(record: Record) -> Self {
        let mut f = record.fields;
        Self {
            id: record.id,
            name: take_string(&mut f, "name"),
            email: take_string(&mut f, "email"),
            avatar: take_string(&mut f, "avatar"),
            profile_picture: take_string(&mut f, "profilePicture"),
            created_at: take_string(&mut f, "createdAt"),
            extra: f,
        }
    }
}

impl Timestamped for User {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw stored value; see [`Task::status`] for the parsed form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// `None` for any status outside the known set.
    pub fn status(&self) -> Option<TaskStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn is_completed(&self) -> bool {
        self.status() == Some(TaskStatus::Completed)
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or(&self.id)
    }
}

impl Entity for Task {
    fn from_record(record: Record) -> Self {
        let mut f = record.fields;
        Self {
            id: record.id,
            name: take_string(&mut f, "name"),
            title: take_string(&mut f, "title"),
            description: take_string(&mut f, "description"),
            status: take_string(&mut f, "status"),
            due_date: take_string(&mut f, "dueDate"),
            user_id: take_string(&mut f, "userId"),
            created_at: take_string(&mut f, "createdAt"),
            extra: f,
        }
    }
}

impl Timestamped for Task {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// A comment attached to a workspace or a workspace task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Comment {
    fn from_value(fallback_id: String, value: Value) -> Self {
        let mut f = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            id: take_string(&mut f, "id").unwrap_or(fallback_id),
            text: take_string(&mut f, "text"),
            author: take_string(&mut f, "author"),
            created_at: take_string(&mut f, "createdAt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceTask {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for WorkspaceTask {
    fn from_record(record: Record) -> Self {
        let mut f = record.fields;
        Self {
            id: record.id,
            title: take_string(&mut f, "title"),
            status: take_string(&mut f, "status"),
            assigned_to: take_string(&mut f, "assignedTo"),
            workspace_id: take_string(&mut f, "workspaceId"),
            created_at: take_string(&mut f, "createdAt"),
            comments: take_comments(&mut f, "comments"),
            extra: f,
        }
    }
}

impl Timestamped for WorkspaceTask {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// A project, stored under its owner at `projects/{userId}/{projectId}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    /// Owner, taken from the storage path.
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Project {
    fn from_record(record: Record) -> Self {
        let mut f = record.fields;
        Self {
            id: record.id,
            user_id: take_string(&mut f, "userId").unwrap_or_default(),
            name: take_string(&mut f, "name"),
            description: take_string(&mut f, "description"),
            file_url: take_string(&mut f, "fileUrl"),
            extra: f,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "fileURL", skip_serializing_if = "Vec::is_empty")]
    pub file_urls: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Workspace {
    fn from_record(record: Record) -> Self {
        let mut f = record.fields;
        Self {
            id: record.id,
            name: take_string(&mut f, "name"),
            description: take_string(&mut f, "description"),
            created_by: take_string(&mut f, "createdBy"),
            created_at: take_string(&mut f, "createdAt"),
            file_urls: take_strings(&mut f, "fileURL"),
            comments: take_comments(&mut f, "comments"),
            extra: f,
        }
    }
}

impl Timestamped for Workspace {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// A comment on a public repository, stored inline under the repository.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoComment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicRepo {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    /// Keyed by comment id; generated keys sort chronologically.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub comments: BTreeMap<String, RepoComment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for PublicRepo {
    fn from_record(record: Record) -> Self {
        let mut f = record.fields;
        let comments = match f.remove("comments") {
            Some(Value::Object(map)) => map
                .into_iter()
                .map(|(id, value)| {
                    let mut c = match value {
                        Value::Object(map) => map,
                        _ => Map::new(),
                    };
                    let comment = RepoComment {
                        comment: take_string(&mut c, "comment"),
                        username: take_string(&mut c, "username"),
                        timestamp: take_string(&mut c, "timestamp"),
                    };
                    (id, comment)
                })
                .collect(),
            _ => BTreeMap::new(),
        };
        Self {
            id: record.id,
            name: take_string(&mut f, "name"),
            description: take_string(&mut f, "description"),
            language: take_string(&mut f, "language"),
            uploaded_by_name: take_string(&mut f, "uploadedByName"),
            uploaded_at: take_string(&mut f, "uploadedAt"),
            file_url: take_string(&mut f, "fileUrl"),
            comments,
            extra: f,
        }
    }
}

impl Timestamped for PublicRepo {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.uploaded_at.as_deref().and_then(parse_timestamp)
    }
}

/// The single admin login stored at `admin`.
#[derive(Clone, PartialEq)]
pub struct AdminCredential {
    pub email: String,
    pub password: String,
}

impl AdminCredential {
    pub fn from_value(value: Value) -> Option<Self> {
        let record = Record::new("admin", value);
        Some(Self {
            email: record.get_str("email")?,
            password: record.get_str("password")?,
        })
    }
}

impl fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredential")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// RFC 3339 strings, plain dates, or epoch milliseconds.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
}

/// Remove `key` when it holds a scalar; anything else stays in `extra`.
fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    let value = fields.get(key).and_then(scalar_string)?;
    fields.remove(key);
    Some(value)
}

fn take_strings(fields: &mut Map<String, Value>, key: &str) -> Vec<String> {
    match fields.remove(key) {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_string).collect(),
        Some(Value::Object(map)) => map.values().filter_map(scalar_string).collect(),
        Some(other) => scalar_string(&other).into_iter().collect(),
        None => Vec::new(),
    }
}

/// Lists come back from the database either as arrays or as index-keyed maps.
fn take_comments(fields: &mut Map<String, Value>, key: &str) -> Vec<Comment> {
    match fields.remove(key) {
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .filter(|(_, v)| v.is_object())
            .map(|(i, v)| Comment::from_value(i.to_string(), v))
            .collect(),
        Some(Value::Object(map)) => map
            .into_iter()
            .filter(|(_, v)| v.is_object())
            .map(|(k, v)| Comment::from_value(k, v))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_key_wins_over_stored_id() {
        let record = Record::new("k1", json!({"id": "bogus", "name": "A"}));
        assert_eq!(record.id, "k1");
        assert!(!record.fields.contains_key("id"));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"id": "k1", "name": "A"}));
    }

    #[test]
    fn non_object_record_has_only_an_id() {
        let record = Record::new("k1", json!("just a string"));
        assert!(record.fields.is_empty());
    }

    #[test]
    fn task_reads_fields_leniently() {
        let task = Task::from_record(Record::new(
            "t1",
            json!({"name": "Ship", "status": "in-progress", "userId": 42, "dueDate": {"nested": true}}),
        ));
        assert_eq!(task.user_id.as_deref(), Some("42"));
        assert_eq!(task.status(), Some(TaskStatus::InProgress));
        assert!(task.due_date.is_none());
        assert_eq!(task.extra.get("dueDate"), Some(&json!({"nested": true})));
    }

    #[test]
    fn unknown_status_parses_to_none() {
        let task = Task::from_record(Record::new("t1", json!({"status": "bogus"})));
        assert_eq!(task.status.as_deref(), Some("bogus"));
        assert_eq!(task.status(), None);
        assert!(!task.is_completed());
    }

    #[test]
    fn task_display_name_falls_back() {
        let titled = Task::from_record(Record::new("t1", json!({"title": "Draft"})));
        assert_eq!(titled.display_name(), "Draft");
        let bare = Task::from_record(Record::new("t2", json!({})));
        assert_eq!(bare.display_name(), "t2");
    }

    #[test]
    fn task_serializes_in_stored_shape() {
        let task = Task::from_record(Record::new(
            "t1",
            json!({"name": "Ship", "userId": "u1", "priority": 3}),
        ));
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value, json!({"id": "t1", "name": "Ship", "userId": "u1", "priority": 3}));
    }

    #[test]
    fn user_first_name() {
        let user = User::from_record(Record::new("u1", json!({"name": "Aarav Sharma"})));
        assert_eq!(user.first_name(), "Aarav");
        let nameless = User::from_record(Record::new("u2", json!({})));
        assert_eq!(nameless.first_name(), "u2");
    }

    #[test]
    fn workspace_reads_lists_in_either_shape() {
        let ws = Workspace::from_record(Record::new(
            "w1",
            json!({
                "name": "Design",
                "fileURL": ["a.pdf", "b.pdf"],
                "comments": {"0": {"id": "c1", "text": "hi", "author": "Priya"}, "1": {"text": "no id"}}
            }),
        ));
        assert_eq!(ws.file_urls, vec!["a.pdf", "b.pdf"]);
        assert_eq!(ws.comments.len(), 2);
        assert_eq!(ws.comments[0].id, "c1");
        assert_eq!(ws.comments[1].id, "1");
    }

    #[test]
    fn public_repo_comments_keyed_by_id() {
        let repo = PublicRepo::from_record(Record::new(
            "r1",
            json!({"name": "lib", "comments": {"c2": {"comment": "late"}, "c1": {"comment": "early", "username": "x"}}}),
        ));
        let ids: Vec<&String> = repo.comments.keys().collect();
        assert_eq!(ids, vec!["c1", "c2"]);
        assert_eq!(repo.comments["c1"].username.as_deref(), Some("x"));
    }

    #[test]
    fn admin_credential_requires_both_fields() {
        assert!(AdminCredential::from_value(json!({"email": "a@b.c"})).is_none());
        let cred = AdminCredential::from_value(json!({"email": "a@b.c", "password": "pw"})).unwrap();
        assert!(!format!("{:?}", cred).contains("pw\""));
    }

    #[test]
    fn parses_timestamp_formats() {
        assert!(parse_timestamp("2025-03-15T09:30:00.000Z").is_some());
        assert!(parse_timestamp("2025-01-15").is_some());
        assert_eq!(
            parse_timestamp("1700000000000").map(|d| d.timestamp()),
            Some(1_700_000_000)
        );
        assert!(parse_timestamp("yesterday").is_none());
    }
}
