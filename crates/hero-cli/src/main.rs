mod config;
mod images_cmd;
mod onboard_cmd;
mod status_cmd;
mod task_cmd;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use hero_core::generator::GeminiAdapter;
use hero_core::store::Store;
use hero_db::PersistenceGateway;
use hero_db::models::EducationLevel;
use hero_db::slot::MemorySlot;

use config::HeroConfig;

#[derive(Parser)]
#[command(name = "holiday-hero", about = "15-day holiday study planner for kids")]
struct Cli {
    /// Data directory (overrides HERO_DATA_DIR env var)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep state in memory only; nothing is read from or written to disk
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a holiday-hero config file
    Init {
        /// Gemini API key to store in the config file
        #[arg(long)]
        api_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Create a profile and generate a 15-day plan
    Onboard {
        /// Child's name
        #[arg(long)]
        name: String,
        /// Child's age in years
        #[arg(long)]
        age: u32,
        /// Education level: primary, middle or high
        #[arg(long)]
        level: EducationLevel,
        /// Comma-separated target languages (e.g. "English, French")
        #[arg(long, default_value = "")]
        languages: String,
    },
    /// Show overall progress and one line per day
    Status,
    /// Show the four tasks of a day
    Day {
        /// Day number (1-15)
        day: u32,
    },
    /// Mark a task as completed
    Done {
        /// Day number (1-15)
        day: u32,
        /// Task ID (e.g. day-3-funTask)
        task_id: String,
    },
    /// Mark a task as not completed
    Undo {
        /// Day number (1-15)
        day: u32,
        /// Task ID (e.g. day-3-funTask)
        task_id: String,
    },
    /// Save the plan's inspiration images as files
    Images {
        /// Directory to write the images into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Delete the profile, plan and progress
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

/// Execute the `holiday-hero init` command: write config file.
fn cmd_init(api_key: Option<String>, data_dir: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        storage: config::StorageSection {
            data_dir: data_dir.map(Path::to_path_buf),
        },
        gemini: config::GeminiSection {
            api_key,
            ..Default::default()
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    if let Some(dir) = &cfg.storage.data_dir {
        println!("  storage.data_dir = {}", dir.display());
    }
    match &cfg.gemini.api_key {
        Some(key) => {
            let prefix: String = key.chars().take(4).collect();
            println!("  gemini.api_key = {prefix}...");
        }
        None => println!("  gemini.api_key not set; export {} instead", config::API_KEY_ENV),
    }
    println!();
    println!("Next: run `holiday-hero onboard --name ... --age ... --level ...`.");

    Ok(())
}

/// Resolve configuration and open the store: on disk, or in memory with
/// `--ephemeral`.
fn session(cli_data_dir: Option<&Path>, ephemeral: bool) -> anyhow::Result<(HeroConfig, Store)> {
    let resolved = HeroConfig::resolve(cli_data_dir)?;
    let store = if ephemeral {
        Store::open(PersistenceGateway::new(MemorySlot::new()))
    } else {
        tracing::debug!(data_dir = %resolved.storage.data_dir().display(), "opening store");
        Store::open(resolved.storage.open_gateway())
    };
    Ok((resolved, store))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let data_dir = cli.data_dir.as_deref();

    match cli.command {
        Commands::Init { api_key, force } => {
            cmd_init(api_key, data_dir, force)?;
        }
        Commands::Onboard {
            name,
            age,
            level,
            languages,
        } => {
            let (resolved, mut store) = session(data_dir, cli.ephemeral)?;
            onboard_cmd::check_not_onboarded(&store)?;
            let adapter = GeminiAdapter::new(resolved.gemini()?)?;
            let args = onboard_cmd::OnboardArgs {
                name,
                age,
                level,
                languages,
            };
            let summary = onboard_cmd::run_onboard(&mut store, Arc::new(adapter), args).await?;
            println!("{summary}");
        }
        Commands::Status => {
            let (_, store) = session(data_dir, cli.ephemeral)?;
            print!("{}", status_cmd::render_status(&store));
        }
        Commands::Day { day } => {
            let (_, store) = session(data_dir, cli.ephemeral)?;
            print!("{}", status_cmd::render_day(&store, day, status_cmd::color_enabled())?);
        }
        Commands::Done { day, task_id } => {
            let (_, mut store) = session(data_dir, cli.ephemeral)?;
            println!("{}", task_cmd::run_set_completion(&mut store, day, &task_id, true)?);
        }
        Commands::Undo { day, task_id } => {
            let (_, mut store) = session(data_dir, cli.ephemeral)?;
            println!("{}", task_cmd::run_set_completion(&mut store, day, &task_id, false)?);
        }
        Commands::Images { out } => {
            let (_, store) = session(data_dir, cli.ephemeral)?;
            println!("{}", images_cmd::run_images(&store, &out)?);
        }
        Commands::Reset { yes } => {
            if !yes {
                anyhow::bail!("reset deletes the plan and all progress; re-run with --yes to confirm");
            }
            let (_, mut store) = session(data_dir, cli.ephemeral)?;
            store.reset();
            println!("All data cleared. Run `holiday-hero onboard` to start a new plan.");
        }
    }

    Ok(())
}
