use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use campusnav_cli::commands::history::handle_history_command;
use campusnav_cli::commands::init::handle_init_command;
use campusnav_cli::commands::nearby::handle_nearby_command;
use campusnav_cli::commands::recommend::handle_recommend_command;
use campusnav_cli::commands::route::{handle_route_command, RouteCommandArgs};
use campusnav_cli::output::OutputFormat;
use campusnav_lib::{default_database_path, ActorId, Criterion};

/// Environment variable naming the campus database when `--db` is absent.
const DATABASE_ENV: &str = "CAMPUSNAV_DB";

#[derive(Parser, Debug)]
#[command(author, version, about = "Campus walking route planner")]
struct Cli {
    /// Path to the campus database. Falls back to $CAMPUSNAV_DB, then the
    /// platform data directory.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database schema if it does not exist yet.
    Init,
    /// Compute a walking route between two locations.
    Route {
        /// Starting location name or id.
        #[arg(long = "from")]
        from: String,
        /// Destination location name or id.
        #[arg(long = "to")]
        to: String,
        /// Routing criterion: shortest, shaded or scenic.
        #[arg(long, default_value = "shortest")]
        criterion: Criterion,
        /// Record the route in this user's navigation history.
        #[arg(long)]
        actor: Option<ActorId>,
        /// Only walk path records in their stored direction.
        #[arg(long)]
        one_way: bool,
    },
    /// List locations one walkway away within a radius.
    Nearby {
        /// Origin location name or id.
        #[arg(long = "from")]
        from: String,
        /// Maximum walkway length in meters.
        #[arg(long)]
        radius: f64,
        /// Only follow path records in their stored direction.
        #[arg(long)]
        one_way: bool,
    },
    /// Show or clear a user's navigation history.
    History {
        #[arg(long)]
        actor: ActorId,
        /// Delete the history instead of listing it.
        #[arg(long)]
        clear: bool,
    },
    /// Recompute a previous route using the criterion chosen last time.
    Recommend {
        #[arg(long)]
        actor: ActorId,
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let db_path = resolve_database_path(cli.db)?;
    let format = cli.format;

    match cli.command {
        Command::Init => handle_init_command(&db_path),
        Command::Route {
            from,
            to,
            criterion,
            actor,
            one_way,
        } => {
            let args = RouteCommandArgs {
                from,
                to,
                criterion,
                actor,
                one_way,
            };
            handle_route_command(&db_path, &args, format)
        }
        Command::Nearby {
            from,
            radius,
            one_way,
        } => handle_nearby_command(&db_path, &from, radius, one_way, format),
        Command::History { actor, clear } => {
            handle_history_command(&db_path, actor, clear, format)
        }
        Command::Recommend { actor, from, to } => {
            handle_recommend_command(&db_path, actor, &from, &to, format)
        }
    }
}

fn resolve_database_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(path) = env::var_os(DATABASE_ENV).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    default_database_path().context("failed to resolve the default campus database location")
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
