//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use sitepages_api::{ApiReader, RequestContext};
use sitepages_core::{AboutView, get_about_page, get_faculty_page};
use sitepages_shared::{AboutPage, AppConfig, RuntimeMode, init_config, load_config};
use sitepages_storage::Storage;
use tracing::{error, info};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// sitepages — aggregate institutional page content.
#[derive(Parser)]
#[command(
    name = "sitepages",
    version,
    about = "Aggregate About and Faculty page data from the content store and site API.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Runtime mode: development or production. Overrides the config file.
    #[arg(long, env = "SITEPAGES_MODE", global = true)]
    pub mode: Option<RuntimeMode>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the About page data: about text, directors, leadership, messages.
    About {
        /// Content database (defaults to `[store] database_path`).
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Print the Faculty page data: teaching and non-teaching staff.
    Faculty {
        /// Host header of the inbound request (defaults to `[api] default_host`).
        #[arg(long)]
        host: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries
/// the page data.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "sitepages=info",
        1 => "sitepages=debug",
        _ => "sitepages=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config()?;
    if let Some(mode) = cli.mode {
        config.runtime.mode = mode;
    }

    match cli.command {
        Command::About { db } => cmd_about(&config, db).await,
        Command::Faculty { host } => cmd_faculty(&config, host).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(&config).await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_about(config: &AppConfig, db: Option<PathBuf>) -> Result<()> {
    let db_path = match db {
        Some(path) => path,
        None => config.store.resolved_database_path()?,
    };
    info!(path = %db_path.display(), "rendering about page");

    // An unopenable store renders like any other failed read.
    let page = match Storage::open_readonly(&db_path).await {
        Ok(storage) => get_about_page(&storage).await,
        Err(e) => {
            error!(error = %e, "error fetching about content");
            AboutPage::EMPTY
        }
    };

    let view = AboutView::from(page);
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

async fn cmd_faculty(config: &AppConfig, host: Option<String>) -> Result<()> {
    let mode = config.runtime.mode;
    info!(%mode, host = host.as_deref().unwrap_or("-"), "rendering faculty page");

    let reader = ApiReader::new(&config.api, mode)?;
    let ctx = RequestContext { host };
    let page = get_faculty_page(&reader, &ctx).await;

    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_about_with_db() {
        let cli = Cli::try_parse_from(["sitepages", "about", "--db", "/tmp/site.db"]).unwrap();
        match cli.command {
            Command::About { db } => assert_eq!(db, Some(PathBuf::from("/tmp/site.db"))),
            _ => panic!("expected about"),
        }
    }

    #[test]
    fn parses_faculty_with_global_flags() {
        let cli = Cli::try_parse_from([
            "sitepages",
            "faculty",
            "--host",
            "college.example.org",
            "--mode",
            "development",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.mode, Some(RuntimeMode::Development));
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Faculty { host } => assert_eq!(host.as_deref(), Some("college.example.org")),
            _ => panic!("expected faculty"),
        }
    }

    #[test]
    fn rejects_unknown_mode() {
        let result = Cli::try_parse_from(["sitepages", "--mode", "staging", "faculty"]);
        assert!(result.is_err());
    }
}
