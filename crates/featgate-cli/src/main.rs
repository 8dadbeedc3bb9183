//! featgate CLI - feature-gate resolution from the command line
//!
//! Loads feature definition directories and answers availability queries
//! over them: list the APIs, expand a feature into its end-to-end record
//! combinations, or check whether it is generally available.
//!
//! # Logging
//!
//! Terminal filter priority: `--debug` > `--verbose` > `RUST_LOG` env >
//! default `warn`.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use featgate_core::{allowed_channel, load_features, AdmissionPolicy, FeatureCatalog};
use featgate_types::{Channel, FeatureId};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// featgate - feature-gate resolution for extension platforms
#[derive(Parser, Debug)]
#[command(name = "featgate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Feature definition directory (repeatable)
    #[arg(long = "dir", value_name = "DIR", global = true)]
    dirs: Vec<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every API feature in the catalog
    Apis {
        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Print every end-to-end record combination for a feature
    Expand {
        /// Feature identifier, e.g. api:tabs
        feature: String,

        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Check whether a feature is generally available
    Check {
        /// Feature identifier, e.g. api:tabs
        feature: String,

        /// Additionally gate records to this release channel
        #[arg(long, value_name = "CHANNEL")]
        channel: Option<String>,

        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Test whether a requesting channel may use a feature channel
    Channel {
        /// Requesting channel name
        request: String,

        /// Feature channel name (defaults to stable)
        feature: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    match args.command {
        Command::Apis { json } => {
            let catalog = load_catalog(&args.dirs)?;
            cmd_apis(&catalog, json)
        }
        Command::Expand { ref feature, json } => {
            let catalog = load_catalog(&args.dirs)?;
            cmd_expand(&catalog, feature, json)
        }
        Command::Check {
            ref feature,
            ref channel,
            json,
        } => {
            let catalog = load_catalog(&args.dirs)?;
            cmd_check(&catalog, feature, channel.as_deref(), json)
        }
        Command::Channel {
            ref request,
            ref feature,
        } => cmd_channel(request, feature.as_deref()),
    }
}

/// Terminal filter priority: --debug > --verbose > RUST_LOG > "warn".
fn init_tracing(args: &Args) {
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .init();
}

fn load_catalog(dirs: &[PathBuf]) -> Result<FeatureCatalog> {
    if dirs.is_empty() {
        anyhow::bail!("no definition directories; pass at least one --dir");
    }
    debug!(dirs = dirs.len(), "Loading feature definitions");
    let catalog = load_features(dirs.iter().cloned())?;
    debug!(features = catalog.len(), "Catalog ready");
    Ok(catalog)
}

fn cmd_apis(catalog: &FeatureCatalog, json: bool) -> Result<()> {
    let apis = catalog.all_apis();
    if json {
        println!("{}", serde_json::to_string_pretty(&apis)?);
    } else {
        for id in apis {
            println!("{id}");
        }
    }
    Ok(())
}

fn cmd_expand(catalog: &FeatureCatalog, feature: &str, json: bool) -> Result<()> {
    let id = FeatureId::parse(feature);
    let expansion = catalog.expand(&id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&expansion)?);
        return Ok(());
    }

    for (index, run) in expansion.runs().iter().enumerate() {
        println!("run {}:", index + 1);
        for expanded in run.records() {
            println!("  {}", expanded.id);
        }
    }
    Ok(())
}

fn cmd_check(
    catalog: &FeatureCatalog,
    feature: &str,
    channel: Option<&str>,
    json: bool,
) -> Result<()> {
    let policy = match channel {
        Some(name) => AdmissionPolicy::for_channel(name.parse::<Channel>()?),
        None => AdmissionPolicy::new(),
    };

    let id = FeatureId::parse(feature);
    let expansion = catalog.expand(&id)?;
    let admission = policy.admit(&expansion);

    if json {
        println!("{}", serde_json::to_string_pretty(&admission)?);
        return Ok(());
    }

    match admission {
        Some(admission) if admission.permissions.is_empty() => {
            println!("{feature}: admissible, no permissions required");
        }
        Some(admission) => {
            let permissions: Vec<&str> =
                admission.permissions.iter().map(String::as_str).collect();
            println!("{feature}: admissible, requires {}", permissions.join(", "));
        }
        None => {
            // Restricted features are a normal outcome, not a failure.
            println!("{feature}: not admissible");
        }
    }
    Ok(())
}

fn cmd_channel(request: &str, feature: Option<&str>) -> Result<()> {
    let allowed = allowed_channel(request, feature)?;
    println!("{allowed}");
    Ok(())
}
