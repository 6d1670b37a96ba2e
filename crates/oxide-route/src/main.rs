//! oxide-route CLI
//!
//! Command-line tool for resolving and assembling locations against a JSON
//! route configuration.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use oxide_route::prelude::*;

/// Resolve and assemble locations against declarative routes.
#[derive(Parser)]
#[command(name = "oxide-route")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Route configuration file (JSON).
    #[arg(short, long, env = "OXIDE_ROUTES", default_value = "routes.json")]
    routes: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a location and print the matched route and its params.
    Resolve {
        /// Location to resolve, e.g. `/users/42?tab=posts`.
        location: String,
    },

    /// Assemble a location for a named route.
    Assemble {
        /// Dot-joined route key.
        key: String,

        /// Param value as `name=text`; repeat for repeated params.
        #[arg(short, long = "param", value_name = "NAME=TEXT")]
        params: Vec<String>,
    },

    /// List every compiled route.
    List,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let routes = RoutesConfig::from_file(&cli.routes)
        .and_then(|config| config.compile())
        .with_context(|| format!("loading routes from {}", cli.routes.display()))?;

    match cli.command {
        Commands::Resolve { location } => {
            let Some(resolved) = routes.resolve(&location) else {
                bail!("no route matched `{location}`");
            };
            let output = json!({
                "key": resolved.key(),
                "path": resolved.route().path().template(),
                "params": resolved.params(),
                "matches": resolved
                    .matches()
                    .iter()
                    .map(|m| m.name.clone())
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Commands::Assemble { key, params } => {
            let Some(route) = routes.find_by_key(&key) else {
                bail!("route not found: {key}");
            };
            let params = parse_params(route, &params)?;
            debug!(?params, "assembling {key}");
            println!("{}", route.assemble(&params)?);
        }

        Commands::List => {
            info!("{} routes", routes.len());
            for route in routes.iter() {
                let key = if route.name().is_some() {
                    route.key()
                } else {
                    "-"
                };
                let query = route.query().template();
                if query.is_empty() {
                    println!("{key:<30} {}", route.path().template());
                } else {
                    println!("{key:<30} {}?{query}", route.path().template());
                }
            }
        }
    }

    Ok(())
}

/// Decodes `name=text` arguments through the route's own codecs.
fn parse_params(route: &RouteNode, args: &[String]) -> anyhow::Result<Params> {
    let mut params = Params::new();

    for arg in args {
        let Some((name, text)) = arg.split_once('=') else {
            bail!("expected NAME=TEXT, got `{arg}`");
        };
        let Some(slot) = route.slot(name) else {
            bail!("route `{}` has no param `{name}`", route.label());
        };
        let value = slot
            .param
            .decode(text)
            .with_context(|| format!("invalid value for `{name}`"))?;

        if slot.repeated {
            let mut items = match params.remove(name) {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            };
            items.push(value);
            params.insert(name, Value::Array(items));
        } else {
            params.insert(name, value);
        }
    }

    Ok(params)
}
