use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use taskdeck::{
    Config, Credentials, PartialConfig, Project, ProjectDraft, Task, TaskDraft, TaskPatch,
    Workspace,
};

#[derive(Debug, Parser)]
#[command(name = "taskdeck", version, about = "Manage projects and their tasks")]
struct Cli {
    /// TOML config file.
    #[arg(long, env = "TASKDECK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Base URL of the seed API.
    #[arg(long, env = "TASKDECK_API_URL", global = true)]
    api_url: Option<String>,

    /// Directory holding the local cache.
    #[arg(long, env = "TASKDECK_CACHE_DIR", global = true)]
    cache_dir: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, env = "TASKDECK_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, env = "TASKDECK_LOG", global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and store a session token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Drop the stored session token.
    Logout,
    #[command(subcommand)]
    Projects(ProjectCommand),
    #[command(subcommand)]
    Tasks(TaskCommand),
}

#[derive(Debug, Subcommand)]
enum ProjectCommand {
    List {
        /// Filter by name, client or description.
        #[arg(long)]
        search: Option<String>,
    },
    Show {
        id: u64,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Edit {
        id: u64,
        #[command(flatten)]
        fields: ProjectFields,
    },
    Delete {
        id: u64,
    },
}

#[derive(Debug, Args)]
struct ProjectFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    List {
        #[arg(long)]
        project: u64,
    },
    Show {
        id: u64,
    },
    Add {
        #[arg(long)]
        project: u64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        completed: bool,
    },
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        completed: Option<bool>,
    },
    Toggle {
        id: u64,
    },
    Delete {
        id: u64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let overrides = PartialConfig {
        api_base_url: cli.api_url,
        cache_dir: cli.cache_dir,
        timeout_secs: cli.timeout_secs,
        log_filter: cli.log,
    };
    let config = Config::resolve(cli.config.as_deref(), overrides)?;
    if let Err(err) = taskdeck::logging::init(&config.log_filter) {
        eprintln!("warning: {err}");
    }

    let workspace = Workspace::open(&config).context("failed to open workspace")?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    match cli.command {
        Command::Login { email, password } => {
            workspace.auth().login(&Credentials::new(email, password))?;
            println!("signed in");
        }
        Command::Logout => {
            if workspace.auth().logout()? {
                println!("signed out");
            } else {
                println!("no active session");
            }
        }
        Command::Projects(command) => {
            workspace
                .auth()
                .require()
                .context("run `taskdeck login` first")?;
            runtime.block_on(projects(&workspace, command))?;
        }
        Command::Tasks(command) => {
            workspace
                .auth()
                .require()
                .context("run `taskdeck login` first")?;
            runtime.block_on(tasks(&workspace, command))?;
        }
    }
    Ok(())
}

async fn projects(workspace: &Workspace, command: ProjectCommand) -> Result<()> {
    let store = workspace.projects();
    match command {
        ProjectCommand::List { search } => {
            let all = store.fetch_all().await.context("could not load projects")?;
            let shown = match search {
                Some(term) => store.search(&term)?,
                None => all,
            };
            if shown.is_empty() {
                println!("no projects");
            }
            for project in &shown {
                print_project(project);
            }
        }
        ProjectCommand::Show { id } => {
            let project = store
                .fetch_one(id)
                .await
                .with_context(|| format!("could not load project {id}"))?;
            print_project(&project);
            if !project.email.is_empty() {
                println!("    email: {}", project.email);
            }
        }
        ProjectCommand::Create { name, description } => {
            let project = store.create(&ProjectDraft::new(name, description))?;
            println!("created project {}", project.id);
        }
        ProjectCommand::Edit { id, fields } => {
            let current = store
                .fetch_one(id)
                .await
                .with_context(|| format!("could not load project {id}"))?;
            let draft = ProjectDraft::new(
                fields.name.unwrap_or_else(|| current.name.clone()),
                fields
                    .description
                    .unwrap_or_else(|| current.description().to_string()),
            );
            let project = store.edit(id, &draft)?;
            println!("updated project {}", project.id);
        }
        ProjectCommand::Delete { id } => {
            if store.delete(id)? {
                println!("deleted project {id}");
            } else {
                println!("no project {id}");
            }
        }
    }
    Ok(())
}

async fn tasks(workspace: &Workspace, command: TaskCommand) -> Result<()> {
    let store = workspace.tasks();
    match command {
        TaskCommand::List { project } => {
            let tasks = store
                .fetch_by_parent(project)
                .await
                .with_context(|| format!("could not load tasks of project {project}"))?;
            if tasks.is_empty() {
                println!("no tasks");
            }
            for task in &tasks {
                print_task(task);
            }
        }
        TaskCommand::Show { id } => {
            let task = store
                .fetch_one(id)
                .await
                .with_context(|| format!("could not load task {id}"))?;
            print_task(&task);
        }
        TaskCommand::Add {
            project,
            title,
            completed,
        } => {
            let task = store.create(TaskDraft::new(project, title).completed(completed))?;
            println!("created task {}", task.id);
        }
        TaskCommand::Update {
            id,
            title,
            completed,
        } => {
            let patch = TaskPatch {
                user_id: None,
                title,
                completed,
            };
            if patch.is_empty() {
                anyhow::bail!("nothing to update; pass --title and/or --completed");
            }
            let task = store.update(id, &patch)?;
            print_task(&task);
        }
        TaskCommand::Toggle { id } => {
            let task = store.toggle(id)?;
            print_task(&task);
        }
        TaskCommand::Delete { id } => {
            if store.delete(id)? {
                println!("deleted task {id}");
            } else {
                println!("no task {id}");
            }
        }
    }
    Ok(())
}

fn print_project(project: &Project) {
    let client = if project.company.name.is_empty() {
        "-"
    } else {
        project.company.name.as_str()
    };
    println!(
        "{:>4}  {}  [{}]  {}",
        project.id,
        project.name,
        client,
        project.description()
    );
}

fn print_task(task: &Task) {
    println!(
        "{:>4}  [{}]  {}  (project {})",
        task.id,
        task.status_label(),
        task.title,
        task.user_id
    );
}
