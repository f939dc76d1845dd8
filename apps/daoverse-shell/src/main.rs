mod config;
mod logging;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use session::{
    Access, FileSettingsStore, Gate, InMemorySettingsStore, Network, SessionClient,
    SessionModule, SessionSnapshot, SettingsStore, StaticIdentityConfig, StaticIdentityProvider,
    UserSettings,
};

use crate::config::{AppConfig, StorageBackend};

/// DAOVerse shell - drives the session module from the command line
#[derive(Parser)]
#[command(name = "daoverse-shell")]
#[command(about = "DAOVerse shell - identity session and user settings")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Network override (overrides config and environment)
    #[arg(short, long, value_enum)]
    network: Option<NetworkArg>,

    /// Settings directory override
    #[arg(long)]
    settings_dir: Option<PathBuf>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum NetworkArg {
    Local,
    Ic,
}

impl From<NetworkArg> for Network {
    fn from(value: NetworkArg) -> Self {
        match value {
            NetworkArg::Local => Self::Local,
            NetworkArg::Ic => Self::Ic,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Restore any existing session and print it
    Status,
    /// Run the login ceremony
    Login,
    /// End the current session
    Logout,
    /// Show or replace the user settings record
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Validate configuration and exit
    Check,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the in-memory settings record
    Show,
    /// Replace the settings record with the JSON document in FILE
    Set { file: PathBuf },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport<'a> {
    session: &'a SessionSnapshot,
    authenticated_screens: Gate,
    display_name: &'a str,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) defaults -> 2) YAML -> 3) DFX_NETWORK -> 4) DAOVERSE__* -> 5) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(network) = cli.network {
        config.session.network = network.into();
    }
    if let Some(dir) = &cli.settings_dir {
        config.storage.dir = Some(dir.clone());
    }

    logging::init(&config.logging, cli.verbose);
    tracing::debug!(network = ?config.session.network, "configuration loaded");

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Check => check_config(&config),
        Commands::Status => {
            let client = start_session(&config).await?;
            print_status(&*client, &client.snapshot())
        }
        Commands::Login => {
            let client = start_session(&config).await?;
            let snapshot = client.login().await?;
            print_status(&*client, &snapshot)
        }
        Commands::Logout => {
            let client = start_session(&config).await?;
            let snapshot = client.logout().await?;
            print_status(&*client, &snapshot)
        }
        Commands::Settings(SettingsCommand::Show) => {
            let client = start_session(&config).await?;
            print_settings(&client.user_settings())
        }
        Commands::Settings(SettingsCommand::Set { file }) => {
            let settings = read_settings(&file)?;
            let client = start_session(&config).await?;
            client.update_user_settings(settings).await?;
            print_settings(&client.user_settings())
        }
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    let url = config.session.identity_provider_url()?;
    println!("Configuration is valid");
    println!("identity provider: {url}");
    Ok(())
}

/// Build the session module and run the startup session check.
async fn start_session(config: &AppConfig) -> Result<Arc<dyn SessionClient>> {
    let (store, session_file): (Arc<dyn SettingsStore>, Option<PathBuf>) =
        match config.storage.backend {
            StorageBackend::Memory => (Arc::new(InMemorySettingsStore::new()), None),
            StorageBackend::File => {
                let store = match &config.storage.dir {
                    Some(dir) => FileSettingsStore::open(dir.clone())?,
                    None => FileSettingsStore::open_default()?,
                };
                // Keep the session marker next to the settings directory.
                let session_file = store.dir().with_file_name("session");
                (Arc::new(store), Some(session_file))
            }
        };

    let identity = StaticIdentityConfig {
        session_file: config.identity.session_file.clone().or(session_file),
        ..config.identity.clone()
    };
    let module = SessionModule::new(
        &config.session,
        Arc::new(StaticIdentityProvider::new(identity)),
        store,
    )?;

    let client = module.client();
    let snapshot = client.initialize().await;
    tracing::info!(authenticated = snapshot.authenticated(), "session ready");
    Ok(client)
}

fn read_settings(path: &Path) -> Result<UserSettings> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid settings in {}", path.display()))
}

fn print_settings(settings: &UserSettings) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}

fn print_status(client: &dyn SessionClient, snapshot: &SessionSnapshot) -> Result<()> {
    let settings = client.user_settings();
    let report = StatusReport {
        session: snapshot,
        authenticated_screens: snapshot.gate(Access::Authenticated),
        display_name: &settings.display_name,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
