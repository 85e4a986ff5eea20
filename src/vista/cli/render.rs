//! Terminal rendering.
//!
//! Every renderer returns a `String` so layout can be tested without a
//! terminal. Width math is done on display width, so names with wide
//! characters still line up.

use chrono::Utc;
use colored::{ColoredString, Colorize};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use vista::api::{
    ConfigEntries, Dashboard, ProjectWithUser, TaskWithUser, WorkspaceWithTasks,
};
use vista::model::{parse_timestamp, Comment, Project, PublicRepo, Task, TaskStatus, User, Workspace};
use vista::session::Session;

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const STATUS_WIDTH: usize = 12;
const BAR_WIDTH: usize = 30;

pub(super) fn print_message(message: &str) {
    println!("{}", message.green());
}

pub(super) fn print_error(error: &str) {
    eprintln!("{}", error.red());
}

pub fn render_users(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.\n".to_string();
    }
    let id_width = column_width(users.iter().map(|u| u.id.as_str()));
    users
        .iter()
        .map(|user| {
            let body = match (&user.name, &user.email) {
                (Some(name), Some(email)) => format!("{name} <{email}>"),
                (Some(name), None) => name.clone(),
                (None, Some(email)) => format!("<{email}>"),
                (None, None) => String::new(),
            };
            list_line(&user.id, id_width, &body, &format_time_ago(user.created_at.as_deref()))
        })
        .collect()
}

pub fn render_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.\n".to_string();
    }
    let id_width = column_width(tasks.iter().map(|t| t.id.as_str()));
    tasks
        .iter()
        .map(|task| {
            let right = task
                .due_date
                .as_deref()
                .map(|due| format!("due {due}"))
                .unwrap_or_else(|| format_time_ago(task.created_at.as_deref()));
            status_line(
                &task.id,
                id_width,
                task.status.as_deref(),
                task.display_name(),
                &right,
            )
        })
        .collect()
}

pub fn render_task_detail(joined: &TaskWithUser) -> String {
    let task = &joined.task;
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", task.id.yellow(), task.display_name().bold()));
    field(&mut out, "Status", task.status.as_deref());
    field(&mut out, "Due", task.due_date.as_deref());
    field(&mut out, "Description", task.description.as_deref());
    out.push_str(&format!("  {:<12} {}\n", "Owner", owner(joined.user.as_ref(), task.user_id.as_deref())));
    out
}

pub fn render_projects(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects found.\n".to_string();
    }
    let id_width = column_width(projects.iter().map(|p| p.id.as_str()));
    projects
        .iter()
        .map(|project| {
            let body = project.name.clone().unwrap_or_default();
            list_line(&project.id, id_width, &body, &format!("owner {}", project.user_id))
        })
        .collect()
}

pub fn render_project_detail(joined: &ProjectWithUser) -> String {
    let project = &joined.project;
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        project.id.yellow(),
        project.name.as_deref().unwrap_or("(unnamed)").bold()
    ));
    field(&mut out, "Description", project.description.as_deref());
    field(&mut out, "File", project.file_url.as_deref());
    out.push_str(&format!(
        "  {:<12} {}\n",
        "Owner",
        owner(joined.user.as_ref(), Some(&project.user_id))
    ));
    out
}

pub fn render_workspaces(workspaces: &[Workspace]) -> String {
    if workspaces.is_empty() {
        return "No workspaces found.\n".to_string();
    }
    let id_width = column_width(workspaces.iter().map(|w| w.id.as_str()));
    workspaces
        .iter()
        .map(|ws| {
            let mut body = ws.name.clone().unwrap_or_default();
            if let Some(by) = &ws.created_by {
                body.push_str(&format!(" (by {by})"));
            }
            list_line(&ws.id, id_width, &body, &format_time_ago(ws.created_at.as_deref()))
        })
        .collect()
}

pub fn render_workspace_detail(joined: &WorkspaceWithTasks) -> String {
    let ws = &joined.workspace;
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        ws.id.yellow(),
        ws.name.as_deref().unwrap_or("(unnamed)").bold()
    ));
    field(&mut out, "Description", ws.description.as_deref());
    field(&mut out, "Created by", ws.created_by.as_deref());
    for url in &ws.file_urls {
        field(&mut out, "File", Some(url));
    }
    render_comments(&mut out, &ws.comments);

    out.push_str(&format!("\n{} ({})\n", "Tasks".bold(), joined.tasks.len()));
    if joined.tasks.is_empty() {
        out.push_str("  No tasks in this workspace.\n");
    }
    let id_width = column_width(joined.tasks.iter().map(|t| t.id.as_str()));
    for task in &joined.tasks {
        let right = task
            .assigned_to
            .as_deref()
            .map(|who| format!("@{who}"))
            .unwrap_or_default();
        out.push_str(&status_line(
            &task.id,
            id_width,
            task.status.as_deref(),
            task.title.as_deref().unwrap_or_default(),
            &right,
        ));
    }
    out
}

pub fn render_repos(repos: &[PublicRepo]) -> String {
    if repos.is_empty() {
        return "No repositories found.\n".to_string();
    }
    let id_width = column_width(repos.iter().map(|r| r.id.as_str()));
    repos
        .iter()
        .map(|repo| {
            let mut body = repo.name.clone().unwrap_or_default();
            if let Some(lang) = &repo.language {
                body.push_str(&format!(" [{lang}]"));
            }
            if !repo.comments.is_empty() {
                body.push_str(&format!(" {} comments", repo.comments.len()));
            }
            list_line(&repo.id, id_width, &body, &format_time_ago(repo.uploaded_at.as_deref()))
        })
        .collect()
}

pub fn render_repo_detail(repo: &PublicRepo) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        repo.id.yellow(),
        repo.name.as_deref().unwrap_or("(unnamed)").bold()
    ));
    field(&mut out, "Description", repo.description.as_deref());
    field(&mut out, "Language", repo.language.as_deref());
    field(&mut out, "Uploaded by", repo.uploaded_by_name.as_deref());
    field(&mut out, "File", repo.file_url.as_deref());
    if !repo.comments.is_empty() {
        out.push_str(&format!("\n{} ({})\n", "Comments".bold(), repo.comments.len()));
        let id_width = column_width(repo.comments.keys().map(String::as_str));
        for (id, comment) in &repo.comments {
            let body = format!(
                "{}: {}",
                comment.username.as_deref().unwrap_or("anonymous"),
                comment.comment.as_deref().unwrap_or_default()
            );
            out.push_str(&list_line(id, id_width, &body, &format_time_ago(comment.timestamp.as_deref())));
        }
    }
    out
}

pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}   {} {}\n",
        "Tasks:".bold(),
        dashboard.total_tasks,
        "Users:".bold(),
        dashboard.total_users
    ));

    out.push_str(&format!("\n{}\n", "Task status".bold()));
    let buckets = dashboard.status_counts.buckets();
    let max = buckets.iter().map(|(_, n)| *n).max().unwrap_or(0);
    for (status, count) in buckets {
        let bar = "█".repeat(scale(count, max));
        out.push_str(&format!(
            "  {:<width$} {} {}\n",
            status.label(),
            color_status(status, &bar),
            count,
            width = STATUS_WIDTH
        ));
    }

    out.push_str(&format!("\n{}\n", "Productivity".bold()));
    if dashboard.productivity.is_empty() {
        out.push_str("  No users found.\n");
        return out;
    }
    let name_width = column_width(dashboard.productivity.iter().map(|p| p.name.as_str())).max(4);
    out.push_str(&format!(
        "  {} {:>9} {:>7}\n",
        pad_to_width("Name", name_width).dimmed(),
        "Completed".dimmed(),
        "Active".dimmed()
    ));
    for row in &dashboard.productivity {
        out.push_str(&format!(
            "  {} {:>9} {:>7}\n",
            pad_to_width(&row.name, name_width),
            row.tasks_completed,
            row.active_tasks
        ));
    }
    out
}

pub fn render_config(entries: &ConfigEntries) -> String {
    let width = column_width(entries.iter().map(|(k, _)| k.as_str()));
    entries
        .iter()
        .map(|(key, value)| {
            let value = if value.is_empty() {
                "(unset)".dimmed().to_string()
            } else {
                value.clone()
            };
            format!("{} = {}\n", pad_to_width(key, width), value)
        })
        .collect()
}

pub fn render_session(session: &Session) -> String {
    if !session.logged_in {
        return "Not logged in.\n".to_string();
    }
    let who = session.email.as_deref().unwrap_or("admin");
    match session.since {
        Some(since) => format!("Logged in as {} since {}\n", who, since.format("%Y-%m-%d %H:%M UTC")),
        None => format!("Logged in as {}\n", who),
    }
}

fn render_comments(out: &mut String, comments: &[Comment]) {
    if comments.is_empty() {
        return;
    }
    out.push_str(&format!("\n{} ({})\n", "Comments".bold(), comments.len()));
    for comment in comments {
        out.push_str(&format!(
            "  {}: {}\n",
            comment.author.as_deref().unwrap_or("anonymous"),
            comment.text.as_deref().unwrap_or_default()
        ));
    }
}

fn field(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        out.push_str(&format!("  {:<12} {}\n", label, value));
    }
}

fn owner(user: Option<&User>, user_id: Option<&str>) -> String {
    match (user, user_id) {
        (Some(user), _) => format!(
            "{} ({})",
            user.name.as_deref().unwrap_or(&user.id),
            user.id
        ),
        (None, Some(id)) => format!("{id} (no such user)").dimmed().to_string(),
        (None, None) => "(none)".dimmed().to_string(),
    }
}

fn status_cell(raw: Option<&str>) -> ColoredString {
    let text = truncate_to_width(raw.unwrap_or("-"), STATUS_WIDTH);
    let text = pad_to_width(&text, STATUS_WIDTH);
    match raw.and_then(|s| s.parse::<TaskStatus>().ok()) {
        Some(status) => color_status(status, &text),
        None => text.dimmed(),
    }
}

fn color_status(status: TaskStatus, text: &str) -> ColoredString {
    match status {
        TaskStatus::Completed => text.green(),
        TaskStatus::InProgress => text.yellow(),
        TaskStatus::Pending => text.normal(),
    }
}

fn scale(count: usize, max: usize) -> usize {
    if max == 0 {
        return 0;
    }
    (count * BAR_WIDTH).div_ceil(max)
}

fn column_width<'a>(cells: impl Iterator<Item = &'a str>) -> usize {
    cells.map(|c| c.width()).max().unwrap_or(0)
}

fn list_line(id: &str, id_width: usize, body: &str, right: &str) -> String {
    layout_line(id, id_width, None, body, right)
}

fn status_line(id: &str, id_width: usize, status: Option<&str>, body: &str, right: &str) -> String {
    layout_line(id, id_width, Some(status_cell(status)), body, right)
}

/// `  {id}  [{status} ]{body}{padding}  {right}`, truncated to the line width.
fn layout_line(
    id: &str,
    id_width: usize,
    status: Option<ColoredString>,
    body: &str,
    right: &str,
) -> String {
    let right = format!("{:>width$}", right, width = TIME_WIDTH);
    let status_width = if status.is_some() { STATUS_WIDTH + 1 } else { 0 };
    let fixed = 2 + id_width + 2 + status_width + 2 + right.width();
    let available = LINE_WIDTH.saturating_sub(fixed);
    let body = truncate_to_width(body, available);
    let padding = available.saturating_sub(body.width());
    let status = status.map(|s| format!("{s} ")).unwrap_or_default();
    format!(
        "  {}  {}{}{}  {}\n",
        pad_to_width(id, id_width).yellow(),
        status,
        body,
        " ".repeat(padding),
        right.dimmed()
    )
}

fn pad_to_width(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(s.width())))
}

/// Widths are measured on the plain text, so callers color after truncating.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(raw: Option<&str>) -> String {
    let Some(timestamp) = raw.and_then(parse_timestamp) else {
        return String::new();
    };
    let duration = Utc::now().signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}
