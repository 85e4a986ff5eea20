use super::render::{
    print_error, print_message, render_config, render_dashboard, render_project_detail,
    render_projects, render_repo_detail, render_repos, render_session, render_task_detail,
    render_tasks, render_users, render_workspace_detail, render_workspaces,
};
use super::setup::{
    Cli, Commands, ProjectCommands, RepoCommands, TaskCommands, UserCommands, WorkspaceCommands,
};
use clap::Parser;
use serde::Serialize;
use std::path::Path;
use vista::api::{self, ConfigAction, Outcome};
use vista::error::Result;
use vista::init::{default_data_dir, initialize, VistaContext};
use vista::model::Timestamped;
use vista::normalize::sort_newest_first;
use vista::session::SessionStore;

/// How the process should end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    Failure,
}

pub fn run() -> Result<Exit> {
    let cli = Cli::parse();
    let json = cli.json;
    let data_dir = default_data_dir()?;
    tracing::debug!(data_dir = %data_dir.display(), "starting");

    // Commands that never touch the database.
    match &cli.command {
        Commands::Logout => {
            let sessions = SessionStore::new(&data_dir);
            return Ok(emit(json, api::logout(&sessions), |_| String::new()));
        }
        Commands::Status => {
            let sessions = SessionStore::new(&data_dir);
            return Ok(emit(json, api::session_status(&sessions), render_session));
        }
        Commands::Config { key, value } => {
            return Ok(handle_config(json, &data_dir, key.clone(), value.clone()));
        }
        _ => {}
    }

    let mut ctx = initialize(&data_dir)?;

    if let Commands::Login { email, password } = &cli.command {
        let outcome = ctx.api.login(&ctx.sessions, email, password);
        return Ok(emit(json, outcome, |_| String::new()));
    }

    let gate = api::require_login(&ctx.sessions);
    if !gate.success {
        return Ok(emit(json, gate, |_| String::new()));
    }

    let exit = match cli.command {
        Commands::Users { action } => handle_users(json, &mut ctx, action),
        Commands::Tasks { action } => handle_tasks(json, &mut ctx, action),
        Commands::Projects { action } => handle_projects(json, &mut ctx, action),
        Commands::Workspaces { action } => handle_workspaces(json, &mut ctx, action),
        Commands::Repos { action } => handle_repos(json, &mut ctx, action),
        Commands::Dashboard => emit(json, ctx.api.dashboard(), render_dashboard),
        Commands::Login { .. } | Commands::Logout | Commands::Status | Commands::Config { .. } => {
            Exit::Success
        }
    };
    Ok(exit)
}

fn handle_users(json: bool, ctx: &mut VistaContext, action: UserCommands) -> Exit {
    match action {
        UserCommands::List { newest } => {
            let mut outcome = ctx.api.list_users();
            newest_first(&mut outcome, newest);
            emit(json, outcome, |users| render_users(users))
        }
        UserCommands::DeleteEmail { email } => {
            emit(json, ctx.api.delete_users_by_email(&email), |_| String::new())
        }
        UserCommands::Delete { id } => emit(json, ctx.api.delete_user(&id), |_| String::new()),
    }
}

fn handle_tasks(json: bool, ctx: &mut VistaContext, action: TaskCommands) -> Exit {
    match action {
        TaskCommands::List { newest } => {
            let mut outcome = ctx.api.list_tasks();
            newest_first(&mut outcome, newest);
            emit(json, outcome, |tasks| render_tasks(tasks))
        }
        TaskCommands::Show { id } => emit(json, ctx.api.task_with_user(&id), render_task_detail),
        TaskCommands::Complete { id } => emit(json, ctx.api.complete_task(&id), |_| String::new()),
    }
}

fn handle_projects(json: bool, ctx: &mut VistaContext, action: ProjectCommands) -> Exit {
    match action {
        ProjectCommands::List => emit(json, ctx.api.list_projects(), |p| render_projects(p)),
        ProjectCommands::Show { id } => {
            emit(json, ctx.api.project_with_user(&id), render_project_detail)
        }
        ProjectCommands::Delete { id } => {
            emit(json, ctx.api.delete_project(&id), |_| String::new())
        }
    }
}

fn handle_workspaces(json: bool, ctx: &mut VistaContext, action: WorkspaceCommands) -> Exit {
    match action {
        WorkspaceCommands::List { newest } => {
            let mut outcome = ctx.api.list_workspaces();
            newest_first(&mut outcome, newest);
            emit(json, outcome, |w| render_workspaces(w))
        }
        WorkspaceCommands::Show { id } => {
            emit(json, ctx.api.workspace_with_tasks(&id), render_workspace_detail)
        }
        WorkspaceCommands::Delete { id } => {
            emit(json, ctx.api.delete_workspace(&id), |_| String::new())
        }
    }
}

fn handle_repos(json: bool, ctx: &mut VistaContext, action: RepoCommands) -> Exit {
    match action {
        RepoCommands::List { newest } => {
            let mut outcome = ctx.api.list_public_repos();
            newest_first(&mut outcome, newest);
            emit(json, outcome, |r| render_repos(r))
        }
        RepoCommands::Show { id } => emit(json, ctx.api.public_repo(&id), render_repo_detail),
        RepoCommands::Delete { id } => {
            emit(json, ctx.api.delete_public_repo(&id), |_| String::new())
        }
        RepoCommands::DeleteComment {
            repo_id,
            comment_id,
        } => emit(
            json,
            ctx.api.delete_repo_comment(&repo_id, &comment_id),
            |_| String::new(),
        ),
    }
}

fn handle_config(json: bool, dir: &Path, key: Option<String>, value: Option<String>) -> Exit {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let setting = matches!(action, ConfigAction::Set(..));
    emit(json, api::config(dir, action), |entries| {
        if setting {
            String::new()
        } else {
            render_config(entries)
        }
    })
}

fn newest_first<T: Timestamped>(outcome: &mut Outcome<Vec<T>>, newest: bool) {
    if let (true, Some(items)) = (newest, outcome.data.as_mut()) {
        sort_newest_first(items);
    }
}

/// The one output path: JSON as-is, or rendered data plus the message.
fn emit<T: Serialize>(json: bool, outcome: Outcome<T>, render: impl FnOnce(&T) -> String) -> Exit {
    if json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                print_error(&format!("Error: could not encode outcome: {e}"));
                return Exit::Failure;
            }
        }
        return if outcome.success {
            Exit::Success
        } else {
            Exit::Failure
        };
    }

    if !outcome.success {
        let error = outcome.error.as_deref().unwrap_or("unknown error");
        print_error(&format!("Error: {error}"));
        return Exit::Failure;
    }
    if let Some(data) = &outcome.data {
        print!("{}", render(data));
    }
    if let Some(message) = &outcome.message {
        print_message(message);
    }
    Exit::Success
}
