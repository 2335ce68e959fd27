//! Gauveda contact service CLI
//!
//! # Usage
//!
//! ```bash
//! # Run the HTTP server
//! gauveda-contact serve --port 5000 --store sled --data-dir /var/lib/gauveda/inquiries
//!
//! # Check a payload without storing it
//! gauveda-contact validate --file inquiry.json
//!
//! # Store a payload, then list everything stored
//! gauveda-contact submit --file inquiry.json --data-dir /var/lib/gauveda/inquiries
//! gauveda-contact list --data-dir /var/lib/gauveda/inquiries
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Invalid payload, or any other failure

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use gauveda_contact_api::{build_state, create_router, init_tracing, BackendKind, ServiceConfig};
use gauveda_contact_core::{
    parse_payload, ContactError, ContactService, SledInquiryStore, ValidationErrors, Validator,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "gauveda-contact", version, about = "Gauveda Global contact inquiry service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Validate a JSON payload file without storing it
    Validate {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Validate a JSON payload file and store it
    Submit {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(long, env = "GAUVEDA_DATA_DIR", default_value = "data/inquiries")]
        data_dir: PathBuf,
    },

    /// Print every stored inquiry as JSON
    List {
        #[arg(long, env = "GAUVEDA_DATA_DIR", default_value = "data/inquiries")]
        data_dir: PathBuf,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long, env = "GAUVEDA_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long)]
    host: Option<String>,

    #[arg(short, long)]
    port: Option<u16>,

    /// Store backend: memory or sled
    #[arg(long)]
    store: Option<BackendKind>,

    #[arg(long)]
    data_dir: Option<PathBuf>,
}

impl ServeArgs {
    /// Flags take precedence over file and environment
    fn apply(self, config: &mut ServiceConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(store) = self.store {
            config.store.backend = store;
        }
        if let Some(data_dir) = self.data_dir {
            config.store.data_dir = data_dir;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !matches!(cli.command, Commands::Serve(_)) {
        init_cli_tracing();
    }

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Validate { file } => validate(&file),
        Commands::Submit { file, data_dir } => submit(&file, &data_dir).await,
        Commands::List { data_dir } => list(&data_dir).await,
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = ServiceConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    init_tracing(&config.logging)?;

    let state = build_state(&config)?;
    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        addr = %addr,
        store = %config.store.backend,
        metrics = config.metrics.enabled,
        version = env!("CARGO_PKG_VERSION"),
        "Contact service listening"
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Contact service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

/// Warnings and errors to stderr, keeping stdout for JSON output
fn init_cli_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_payload(file: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))
}

fn validate(file: &Path) -> anyhow::Result<()> {
    let payload = parse_payload(&read_payload(file)?)?;

    match Validator::contact_form().validate(&payload) {
        Ok(record) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "valid": true, "record": record }))?
            );
            Ok(())
        }
        Err(errors) => report_invalid(&errors),
    }
}

async fn submit(file: &Path, data_dir: &Path) -> anyhow::Result<()> {
    let body = read_payload(file)?;
    let service = open_service(data_dir)?;

    match service.submit_body(&body).await {
        Ok(inquiry) => {
            println!("{}", serde_json::to_string_pretty(&inquiry)?);
            Ok(())
        }
        Err(ContactError::Validation(errors)) => report_invalid(&errors),
        Err(e) => Err(e.into()),
    }
}

async fn list(data_dir: &Path) -> anyhow::Result<()> {
    let inquiries = open_service(data_dir)?.list().await?;
    println!("{}", serde_json::to_string_pretty(&inquiries)?);
    Ok(())
}

fn open_service(data_dir: &Path) -> anyhow::Result<ContactService> {
    let store = SledInquiryStore::open(data_dir)
        .with_context(|| format!("Failed to open inquiry store at {}", data_dir.display()))?;
    Ok(ContactService::new(Arc::new(store)))
}

fn report_invalid(errors: &ValidationErrors) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({ "valid": false, "errors": errors }))?
    );
    std::process::exit(1);
}
