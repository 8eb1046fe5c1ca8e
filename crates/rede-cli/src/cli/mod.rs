//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use rede_core::config::{Config, paths};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "rede")]
#[command(version)]
#[command(about = "Terminal client for the rede social feed")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Base URL of the remote API (overrides config)
    #[arg(long, env = "REDE_BASE_URL")]
    base_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in and persist the session token
    Login {
        #[arg(long)]
        email: String,

        /// Password; read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Clear the persisted session token
    Logout,
    /// Show the identity behind the current session
    Whoami,
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Password; read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Print a page of the feed
    Feed {
        #[arg(long, default_value_t = 20)]
        limit: usize,

        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Publish a post
    Post {
        /// Post content (words are joined with spaces)
        #[arg(required = true)]
        content: Vec<String>,
    },
    /// Show a user's profile and recent posts
    Profile {
        user_id: i64,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging();

    let mut config = Config::load()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    tracing::debug!(base_url = %config.base_url, "starting");

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(dispatch(cli.command, config))
}

async fn dispatch(command: Option<Commands>, config: Config) -> Result<()> {
    match command {
        None => rede_tui::run(config).await,
        Some(Commands::Login { email, password }) => commands::login(&config, &email, password).await,
        Some(Commands::Logout) => commands::logout(),
        Some(Commands::Whoami) => commands::whoami(&config).await,
        Some(Commands::Signup {
            name,
            email,
            password,
        }) => commands::signup(&config, &name, &email, password).await,
        Some(Commands::Feed { limit, offset }) => commands::feed(&config, limit, offset).await,
        Some(Commands::Post { content }) => commands::post(&config, &content.join(" ")).await,
        Some(Commands::Profile { user_id }) => commands::profile(&config, user_id).await,
    }
}

/// File logging under `<rede_home>/logs`; the TUI owns the terminal, so
/// nothing is ever logged to stdout/stderr. `REDE_LOG` overrides the
/// filter.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let logs_dir = paths::logs_dir();
    std::fs::create_dir_all(&logs_dir).ok()?;

    let appender = tracing_appender::rolling::daily(logs_dir, "rede.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("REDE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("rede=info,rede_core=info,rede_tui=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}
