use super::*;
use crate::model::{Entity, Record};
use crate::normalize::{entities, normalize_collection, normalize_nested};
use crate::store::{NodePath, TreeStore};

/// Every repository, backed by one tree.
pub struct Database<S: TreeStore> {
    store: S,
}

impl<S: TreeStore> Database<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn list<T: Entity>(&self, collection: &str) -> Result<Vec<T>> {
        let node = self.store.read(&NodePath::parse(collection)?)?;
        Ok(entities(normalize_collection(node)))
    }

    fn find<T: Entity>(&self, collection: &str, id: &str) -> Result<Option<T>> {
        let path = NodePath::from_segments([collection, id])?;
        Ok(self
            .store
            .read(&path)?
            .map(|value| T::from_record(Record::new(id, value))))
    }

    fn remove(&mut self, segments: &[&str]) -> Result<()> {
        let path = NodePath::from_segments(segments.iter().copied())?;
        tracing::info!(%path, "deleting");
        self.store.delete(&path)
    }
}

impl<S: TreeStore> UserRepository for Database<S> {
    fn users(&self) -> Result<Vec<User>> {
        self.list(USERS)
    }

    fn find_user(&self, id: &str) -> Result<Option<User>> {
        self.find(USERS, id)
    }

    fn delete_user(&mut self, id: &str) -> Result<()> {
        self.remove(&[USERS, id])
    }
}

impl<S: TreeStore> TaskRepository for Database<S> {
    fn tasks(&self) -> Result<Vec<Task>> {
        self.list(TASKS)
    }

    fn find_task(&self, id: &str) -> Result<Option<Task>> {
        self.find(TASKS, id)
    }

    fn patch_task(&mut self, id: &str, fields: Map<String, Value>) -> Result<()> {
        let path = NodePath::from_segments([TASKS, id])?;
        tracing::info!(%path, fields = ?fields.keys().collect::<Vec<_>>(), "patching");
        self.store.update(&path, fields)
    }
}

impl<S: TreeStore> ProjectRepository for Database<S> {
    fn projects(&self) -> Result<Vec<Project>> {
        let node = self.store.read(&NodePath::parse(PROJECTS)?)?;
        Ok(entities(normalize_nested(node, "userId")))
    }

    fn locate_project(&self, id: &str) -> Result<Option<Project>> {
        crate::store::path::validate_key(id)?;
        let Some(Value::Object(owners)) = self.store.read(&NodePath::parse(PROJECTS)?)? else {
            return Ok(None);
        };
        tracing::debug!(project = id, owners = owners.len(), "scanning project owners");
        for (user_id, group) in owners {
            if let Some(value) = group.get(id) {
                let mut record = Record::new(id, value.clone());
                record
                    .fields
                    .insert("userId".to_string(), Value::String(user_id));
                return Ok(Some(Project::from_record(record)));
            }
        }
        Ok(None)
    }

    fn delete_project(&mut self, user_id: &str, id: &str) -> Result<()> {
        self.remove(&[PROJECTS, user_id, id])
    }
}

impl<S: TreeStore> WorkspaceRepository for Database<S> {
    fn workspaces(&self) -> Result<Vec<Workspace>> {
        self.list(WORKSPACES)
    }

    fn find_workspace(&self, id: &str) -> Result<Option<Workspace>> {
        self.find(WORKSPACES, id)
    }

    fn delete_workspace(&mut self, id: &str) -> Result<()> {
        self.remove(&[WORKSPACES, id])
    }
}

impl<S: TreeStore> WorkspaceTaskRepository for Database<S> {
    fn tasks_in_workspace(&self, workspace_id: &str) -> Result<Vec<WorkspaceTask>> {
        let collection = NodePath::parse(WORKSPACE_TASKS)?;
        let matches = self
            .store
            .read_filtered(&collection, "workspaceId", workspace_id)?;
        Ok(entities(normalize_collection(Some(Value::Object(matches)))))
    }

    fn delete_workspace_task(&mut self, id: &str) -> Result<()> {
        self.remove(&[WORKSPACE_TASKS, id])
    }
}

impl<S: TreeStore> PublicRepoRepository for Database<S> {
    fn public_repos(&self) -> Result<Vec<PublicRepo>> {
        self.list(PUBLIC_REPOS)
    }

    fn find_public_repo(&self, id: &str) -> Result<Option<PublicRepo>> {
        self.find(PUBLIC_REPOS, id)
    }

    fn delete_public_repo(&mut self, id: &str) -> Result<()> {
        self.remove(&[PUBLIC_REPOS, id])
    }

    fn delete_repo_comment(&mut self, repo_id: &str, comment_id: &str) -> Result<()> {
        self.remove(&[PUBLIC_REPOS, repo_id, "comments", comment_id])
    }
}

impl<S: TreeStore> AdminRepository for Database<S> {
    fn admin_credential(&self) -> Result<Option<AdminCredential>> {
        let node = self.store.read(&NodePath::parse(ADMIN)?)?;
        Ok(node.and_then(AdminCredential::from_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VistaError;
    use crate::store::memory::MemoryStore;
    use serde_json::json;

    fn db() -> Database<MemoryStore> {
        Database::new(MemoryStore::from_value(json!({
            "admin": {"email": "admin@vista.io", "password": "pw"},
            "users": {"u1": {"name": "Aarav Sharma", "email": "a@x.io"}},
            "tasks": {"t1": {"name": "Ship", "userId": "u1"}},
            "projects": {
                "u1": {"p1": {"name": "Site"}},
                "u2": {"p2": {"name": "App"}}
            },
            "workSpaceTasks": {
                "w1": {"title": "a", "workspaceId": "A"},
                "w2": {"title": "b", "workspaceId": "B"}
            },
            "publicrep": {"r1": {"name": "lib", "comments": {"c1": {"comment": "nice"}}}}
        })))
    }

    #[test]
    fn finds_by_key() {
        let db = db();
        let user = db.find_user("u1").unwrap().unwrap();
        assert_eq!(user.name.as_deref(), Some("Aarav Sharma"));
        assert!(db.find_user("nobody").unwrap().is_none());
    }

    #[test]
    fn invalid_id_is_an_invalid_path() {
        let db = db();
        assert!(matches!(db.find_task("a.b"), Err(VistaError::InvalidPath(_))));
        assert!(matches!(db.locate_project("a/b"), Err(VistaError::InvalidPath(_))));
    }

    #[test]
    fn locates_project_under_its_owner() {
        let db = db();
        let project = db.locate_project("p2").unwrap().unwrap();
        assert_eq!(project.user_id, "u2");
        assert_eq!(project.name.as_deref(), Some("App"));
        assert!(db.locate_project("p9").unwrap().is_none());
    }

    #[test]
    fn scalar_project_is_found_like_it_is_listed() {
        let mut db = Database::new(MemoryStore::from_value(json!({
            "projects": {"u1": {"p1": "legacy"}}
        })));
        assert_eq!(db.projects().unwrap().len(), 1);
        let project = db.locate_project("p1").unwrap().unwrap();
        assert_eq!(project.id, "p1");
        assert_eq!(project.user_id, "u1");
        db.delete_project("u1", "p1").unwrap();
        assert!(db.projects().unwrap().is_empty());
    }

    #[test]
    fn locate_project_without_projects_collection() {
        let db = Database::new(MemoryStore::new());
        assert!(db.locate_project("p1").unwrap().is_none());
    }

    #[test]
    fn deleting_last_project_prunes_owner() {
        let mut db = db();
        db.delete_project("u1", "p1").unwrap();
        let snapshot = db.store().snapshot();
        assert!(snapshot["projects"].get("u1").is_none());
        assert!(snapshot["projects"].get("u2").is_some());
    }

    #[test]
    fn filters_workspace_tasks() {
        let db = db();
        let tasks = db.tasks_in_workspace("A").unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "w1");
        assert!(db.tasks_in_workspace("Z").unwrap().is_empty());
    }

    #[test]
    fn deletes_repo_comment() {
        let mut db = db();
        db.delete_repo_comment("r1", "c1").unwrap();
        let repo = db.find_public_repo("r1").unwrap().unwrap();
        assert!(repo.comments.is_empty());
    }

    #[test]
    fn reads_admin_credential() {
        let db = db();
        let cred = db.admin_credential().unwrap().unwrap();
        assert_eq!(cred.email, "admin@vista.io");
        let empty = Database::new(MemoryStore::new());
        assert!(empty.admin_credential().unwrap().is_none());
    }
}
