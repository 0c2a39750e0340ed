use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use studyplan_core::{build_plan, parse_deadline, today_in, Task};
use studyplan_server::AppState;
use studyplan_store::{import_csv, TaskRepository};
use tracing::info;

mod config;
mod logging;
mod render;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "studyplan", version, about = "Study task tracker and day-by-day planner")]
struct Cli {
    /// Config file (default: ~/.studyplan/config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Add a task
    Add {
        #[arg(long)]
        course: String,

        #[arg(long)]
        name: String,

        /// Due date, YYYY-MM-DD
        #[arg(long)]
        deadline: String,

        /// Total estimated hours
        #[arg(long)]
        est_hours: f64,

        /// 1 (easy) to 5 (hard)
        #[arg(long)]
        difficulty: i64,
    },

    /// List stored tasks
    List {
        #[arg(long)]
        json: bool,
    },

    /// Print the study plan for the configured horizon
    Plan {
        /// Plan as if this date (YYYY-MM-DD) were today
        #[arg(long)]
        today: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Bulk-add tasks from a CSV (course,name,deadline,est_hours,difficulty)
    Import {
        #[arg(long)]
        csv: PathBuf,
    },

    /// Delete every stored task
    Clear {
        /// Required, since this cannot be undone
        #[arg(long)]
        yes: bool,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file
    Init,

    /// Print the effective config (file + environment)
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Command::Serve { .. } => "info",
        _ => "warn",
    };
    logging::init_tracing(cli.log_level.as_deref().unwrap_or(default_level));

    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => {
                config::init_config(config_path)?;
            }
            ConfigCommand::Show => {
                let cfg = config::load_config(config_path)?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },

        Command::Serve { host, port } => {
            let (cfg, repo) = open(config_path)?;
            serve(&cfg, repo, host, port).await?;
        }

        Command::Add {
            course,
            name,
            deadline,
            est_hours,
            difficulty,
        } => {
            let (_, repo) = open(config_path)?;
            let deadline = parse_deadline(&deadline)?;
            let task = Task::new(course, name, deadline, est_hours, difficulty)?;
            let created = repo.add_task(&task)?;
            print!("{}", render::render_tasks(std::slice::from_ref(&created)));
        }

        Command::List { json } => {
            let (_, repo) = open(config_path)?;
            let tasks = repo.list_tasks()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                print!("{}", render::render_tasks(&tasks));
            }
        }

        Command::Plan { today, json } => {
            let (cfg, repo) = open(config_path)?;
            let today = match today {
                Some(s) => parse_deadline(&s)?,
                None => today_in(cfg.timezone.as_deref())?,
            };
            let tasks = repo.list_tasks()?;
            let plan = build_plan(&tasks, &cfg.planner, today);
            info!(tasks = tasks.len(), %today, "generated plan");

            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print!("{}", render::render_plan(&plan));
            }
        }

        Command::Import { csv } => {
            if !csv.exists() {
                bail!("CSV not found: {}", csv.display());
            }
            let (_, repo) = open(config_path)?;
            let stored = import_csv(&repo, &csv)
                .with_context(|| format!("importing {}", csv.display()))?;
            println!("Imported {} tasks from {}", stored.len(), csv.display());
        }

        Command::Clear { yes } => {
            if !yes {
                bail!("refusing to delete all tasks without --yes");
            }
            let (_, repo) = open(config_path)?;
            let removed = repo.clear_all()?;
            println!("Removed {removed} tasks");
        }
    }

    Ok(())
}

fn open(config_path: Option<&Path>) -> Result<(Config, TaskRepository)> {
    let cfg = config::load_config(config_path)?;
    let repo = TaskRepository::open(&cfg.storage.db_path)?;
    Ok((cfg, repo))
}

async fn serve(
    cfg: &Config,
    repo: TaskRepository,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let host = host.unwrap_or_else(|| cfg.server.host.clone());
    let port = port.unwrap_or(cfg.server.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    let mut state = AppState::new(repo, cfg.planner);
    if let Some(tz) = &cfg.timezone {
        state = state.with_timezone(tz.clone());
    }

    info!(
        db = %cfg.storage.db_path.display(),
        max_hours_per_day = cfg.planner.max_hours_per_day,
        planning_horizon_days = cfg.planner.planning_horizon_days,
        "starting studyplan server"
    );
    studyplan_server::serve(addr, state).await
}
