use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vista", bin_name = "vista", version)]
#[command(
    about = "Admin console for the ProjectVista realtime database",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print the raw outcome as JSON
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in with the admin credentials stored in the database
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Forget the current login
    Logout,

    /// Show whether you are logged in
    Status,

    /// Registered users
    Users {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Personal tasks
    Tasks {
        #[command(subcommand)]
        action: TaskCommands,
    },

    /// Projects, stored under their owners
    Projects {
        #[command(subcommand)]
        action: ProjectCommands,
    },

    /// Shared workspaces and their tasks
    Workspaces {
        #[command(subcommand)]
        action: WorkspaceCommands,
    },

    /// Public repository listings
    Repos {
        #[command(subcommand)]
        action: RepoCommands,
    },

    /// Task status counts and per-user productivity
    Dashboard,

    /// Show or set configuration (vista config [KEY [VALUE]])
    Config {
        key: Option<String>,
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List users
    #[command(alias = "ls")]
    List {
        /// Newest first
        #[arg(long)]
        newest: bool,
    },

    /// Delete every user registered under an email
    DeleteEmail { email: String },

    /// Delete one user by id
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        newest: bool,
    },

    /// Show a task with its owner
    Show { id: String },

    /// Mark a task as completed
    Complete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    #[command(alias = "ls")]
    List,

    /// Show a project with its owner
    Show { id: String },

    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum WorkspaceCommands {
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        newest: bool,
    },

    /// Show a workspace with its tasks
    Show { id: String },

    /// Delete a workspace (its tasks too when cascade_workspace_tasks is set)
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum RepoCommands {
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        newest: bool,
    },

    /// Show a repository with its comments
    Show { id: String },

    #[command(alias = "rm")]
    Delete { id: String },

    /// Delete one comment from a repository
    DeleteComment { repo_id: String, comment_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_subcommand_with_global_json() {
        let cli = Cli::try_parse_from(["vista", "tasks", "show", "t1", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Tasks {
                action: TaskCommands::Show { ref id }
            } if id == "t1"
        ));
    }

    #[test]
    fn parses_repo_comment_delete() {
        let cli = Cli::try_parse_from(["vista", "repos", "delete-comment", "r1", "c1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Repos {
                action: RepoCommands::DeleteComment { .. }
            }
        ));
    }

    #[test]
    fn login_requires_both_flags() {
        assert!(Cli::try_parse_from(["vista", "login", "--email", "a@b.c"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
