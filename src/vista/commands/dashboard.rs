//! Aggregates for the overview screen.
//!
//! Both aggregates are pure functions over lists that were already fetched.
//! Statuses outside the known set are not an error; they simply land in no
//! histogram bucket.

use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::{Task, TaskStatus, User};
use crate::repository::{TaskRepository, UserRepository};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusHistogram {
    pub completed: usize,
    #[serde(rename = "in-progress")]
    pub in_progress: usize,
    pub pending: usize,
}

impl StatusHistogram {
    pub fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Completed => self.completed,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Pending => self.pending,
        }
    }

    /// Always all three buckets, in chart order.
    pub fn buckets(&self) -> [(TaskStatus, usize); 3] {
        TaskStatus::ALL.map(|status| (status, self.count(status)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProductivity {
    pub user_id: String,
    pub name: String,
    pub tasks_completed: usize,
    pub active_tasks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_tasks: usize,
    pub total_users: usize,
    pub status_counts: StatusHistogram,
    pub productivity: Vec<UserProductivity>,
}

pub fn status_histogram(tasks: &[Task]) -> StatusHistogram {
    tasks
        .iter()
        .fold(StatusHistogram::default(), |mut hist, task| {
            match task.status() {
                Some(TaskStatus::Completed) => hist.completed += 1,
                Some(TaskStatus::InProgress) => hist.in_progress += 1,
                Some(TaskStatus::Pending) => hist.pending += 1,
                None => {}
            }
            hist
        })
}

/// One row per user, in user order. Anything not completed counts as active.
pub fn productivity(users: &[User], tasks: &[Task]) -> Vec<UserProductivity> {
    users
        .iter()
        .map(|user| {
            let (completed, active) = tasks
                .iter()
                .filter(|task| task.user_id.as_deref() == Some(user.id.as_str()))
                .fold((0, 0), |(done, open), task| {
                    if task.is_completed() {
                        (done + 1, open)
                    } else {
                        (done, open + 1)
                    }
                });
            UserProductivity {
                user_id: user.id.clone(),
                name: user.first_name(),
                tasks_completed: completed,
                active_tasks: active,
            }
        })
        .collect()
}

pub fn run<R: TaskRepository + UserRepository>(repo: &R) -> Result<CmdResult<Dashboard>> {
    let tasks = repo.tasks()?;
    let users = repo.users()?;
    Ok(CmdResult::new(Dashboard {
        total_tasks: tasks.len(),
        total_users: users.len(),
        status_counts: status_histogram(&tasks),
        productivity: productivity(&users, &tasks),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use crate::model::{Entity, Record};
    use crate::repository::Database;
    use crate::store::memory::MemoryStore;
    use serde_json::json;

    fn tasks_with(statuses: &[&str]) -> Vec<Task> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, s)| Task::from_record(Record::new(format!("t{i}"), json!({"status": s}))))
            .collect()
    }

    #[test]
    fn histogram_drops_unknown_statuses() {
        let hist = status_histogram(&tasks_with(&["completed", "completed", "in-progress", "bogus"]));
        assert_eq!(
            serde_json::to_value(hist).unwrap(),
            json!({"completed": 2, "in-progress": 1, "pending": 0})
        );
    }

    #[test]
    fn histogram_buckets_are_in_chart_order() {
        let hist = status_histogram(&tasks_with(&["pending"]));
        let labels: Vec<&str> = hist.buckets().iter().map(|(s, _)| s.label()).collect();
        assert_eq!(labels, vec!["Completed", "In Progress", "Pending"]);
        assert_eq!(hist.buckets()[2].1, 1);
    }

    #[test]
    fn empty_task_list_gives_zero_buckets() {
        assert_eq!(status_histogram(&[]), StatusHistogram::default());
    }

    #[test]
    fn productivity_splits_completed_and_active() {
        let db = fixtures::database();
        let dashboard = run(&db).unwrap().data;
        let aarav = &dashboard.productivity[0];
        assert_eq!(aarav.name, "Aarav");
        assert_eq!((aarav.tasks_completed, aarav.active_tasks), (2, 0));
        let priya = &dashboard.productivity[1];
        assert_eq!((priya.tasks_completed, priya.active_tasks), (0, 1));
        assert_eq!(dashboard.productivity.len(), 4);
        assert_eq!(dashboard.total_tasks, 5);
    }

    #[test]
    fn unknown_status_counts_as_active() {
        let users = vec![User::from_record(Record::new("u1", json!({"name": "Solo"})))];
        let mut tasks = tasks_with(&["bogus", "completed"]);
        for task in &mut tasks {
            task.user_id = Some("u1".to_string());
        }
        let rows = productivity(&users, &tasks);
        assert_eq!((rows[0].tasks_completed, rows[0].active_tasks), (1, 1));
    }

    #[test]
    fn empty_database_dashboard() {
        let db = Database::new(MemoryStore::new());
        let dashboard = run(&db).unwrap().data;
        assert_eq!(dashboard.status_counts, StatusHistogram::default());
        assert!(dashboard.productivity.is_empty());
    }
}
