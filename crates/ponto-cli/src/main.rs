use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

// `#[zbus::proxy]` generates `PontoProxy` against the daemon interface.
#[zbus::proxy(
    interface = "org.ponto.Ponto1",
    default_service = "org.ponto.Ponto1",
    default_path = "/org/ponto/Ponto1"
)]
trait Ponto {
    async fn enroll(&self, request: &str) -> zbus::Result<String>;
    async fn punch(&self, request: &str) -> zbus::Result<String>;
    async fn status(&self) -> zbus::Result<String>;
    async fn recent_punches(&self, limit: u32) -> zbus::Result<String>;
}

#[derive(Parser)]
#[command(name = "ponto", about = "Ponto attendance CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enroll a person from a descriptor file
    Enroll {
        /// Person's full name
        #[arg(short, long)]
        name: String,
        /// Person's age
        #[arg(short, long)]
        age: i64,
        /// Path to a JSON file holding the 128-element descriptor
        descriptor: PathBuf,
    },
    /// Punch attendance with a descriptor file
    Punch {
        /// Path to a JSON file holding the 128-element descriptor
        descriptor: PathBuf,
        /// Location label to record
        #[arg(short, long)]
        location: Option<String>,
    },
    /// Show daemon status
    Status,
    /// List recent punches
    History {
        /// Maximum records to show
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
}

fn read_descriptor(path: &Path) -> Result<Vec<f32>> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("reading descriptor file {}", path.display()))?;
    let descriptor = serde_json::from_str(&body)
        .with_context(|| format!("parsing descriptor file {}", path.display()))?;
    Ok(descriptor)
}

fn pretty(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| body.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let conn = zbus::Connection::session()
        .await
        .context("connecting to the session bus (is pontod running?)")?;
    let proxy = PontoProxy::new(&conn).await?;

    match cli.command {
        Commands::Enroll {
            name,
            age,
            descriptor,
        } => {
            let request = json!({
                "fullName": name,
                "age": age,
                "descriptor": read_descriptor(&descriptor)?,
            })
            .to_string();
            let body = proxy.enroll(&request).await?;
            println!("{}", pretty(&body));
        }
        Commands::Punch {
            descriptor,
            location,
        } => {
            let request = json!({
                "descriptor": read_descriptor(&descriptor)?,
                "location": location,
            })
            .to_string();
            let body = proxy.punch(&request).await?;
            println!("{}", pretty(&body));
        }
        Commands::Status => {
            let body = proxy.status().await?;
            println!("{}", pretty(&body));
        }
        Commands::History { limit } => {
            let body = proxy.recent_punches(limit).await?;
            println!("{}", pretty(&body));
        }
    }

    Ok(())
}
