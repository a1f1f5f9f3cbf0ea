use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use node_overrides::store::{OverrideStore, Scope, StoreConfig};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Storage directory (overrides config and environment)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Set one path override (value is parsed as JSON, else kept as a string)
    Set {
        workflow: String,
        node: String,
        path: String,
        value: String,
    },
    /// Store an opaque string for a node, bypassing reconstruction
    SetRaw {
        workflow: String,
        node: String,
        text: String,
    },
    /// Show a node's overrides, or a single path
    Get {
        workflow: String,
        node: String,
        path: Option<String>,
    },
    /// Remove one path override
    Unset {
        workflow: String,
        node: String,
        path: String,
    },
    /// Clear a node, or every node of a workflow
    Clear {
        workflow: String,
        node: Option<String>,
    },
    /// Print the reconstructed parameter object for a node
    Reconstruct { workflow: String, node: String },
    /// List scopes with stored overrides
    List,
}

/// CLI values are JSON when they parse, plain strings otherwise
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let mut config =
        StoreConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = args.dir {
        config.storage_dir = dir;
    }
    let backend = Arc::new(config.file_backend());
    let mut store = OverrideStore::load(backend, config.storage_key.clone())
        .await
        .context("Failed to load stored overrides")?;
    log::info!(
        "Using override storage {} (key {})",
        config.storage_dir.display(),
        store.storage_key()
    );

    match args.command {
        Commands::Set {
            workflow,
            node,
            path,
            value,
        } => {
            let scope = Scope::new(workflow, node)?;
            store.set_override(&scope, path, parse_value(&value));
        }
        Commands::SetRaw {
            workflow,
            node,
            text,
        } => {
            let scope = Scope::new(workflow, node)?;
            store.set_overrides(&scope, text);
        }
        Commands::Get {
            workflow,
            node,
            path,
        } => {
            let scope = Scope::new(workflow, node)?;
            let value = match path {
                Some(path) => store.get_override(&scope, &path).cloned(),
                None => store
                    .get(&scope)
                    .map(serde_json::to_value)
                    .transpose()?,
            };
            print_json(&value.unwrap_or(Value::Null))?;
        }
        Commands::Unset {
            workflow,
            node,
            path,
        } => {
            let scope = Scope::new(workflow, node)?;
            if store.remove_override(&scope, &path).is_none() {
                log::warn!("No override {} on {}", path, scope);
            }
        }
        Commands::Clear { workflow, node } => match node {
            Some(node) => store.clear(&Scope::new(workflow, node)?),
            None => store.clear_workflow(&workflow)?,
        },
        Commands::Reconstruct { workflow, node } => {
            let scope = Scope::new(workflow, node)?;
            print_json(&store.reconstruct(&scope))?;
        }
        Commands::List => {
            for scope in store.scopes() {
                let count = store
                    .flat(&scope)
                    .map(|map| map.len().to_string())
                    .unwrap_or_else(|| "raw".to_string());
                println!("{}\t{}", scope, count);
            }
        }
    }

    if store.persist().await.context("Failed to persist overrides")? {
        log::info!("Saved overrides");
    }
    Ok(())
}
