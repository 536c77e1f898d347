//! Cloudstore CLI
//!
//! Offline tooling around the service worker:
//! - Generate a config file
//! - Show how a request would be routed
//! - Run the install-time pre-cache against a live server
//! - Preview the notification for a push payload

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use cloudstore::config::{generate_default_config, Config};
use cloudstore::sw::{self, MemoryCacheStorage, Notification, PushPayload, Request, ReqwestFetcher, RouteTable};

#[derive(Parser)]
#[command(name = "cloudstore")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect the Cloudstore service worker from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/cloudstore/config.toml, then ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show which strategy the worker applies to a request
    Route {
        /// Absolute request URL
        url: String,
        /// HTTP method
        #[arg(short, long, default_value = "GET")]
        method: String,
        /// Treat the request as a page navigation
        #[arg(short, long)]
        navigate: bool,
    },

    /// Fetch every pre-cache asset the way the worker's install step does
    Precache {
        /// Site origin the relative asset paths resolve against
        #[arg(short, long)]
        base_url: String,
        /// Per-request timeout in seconds
        #[arg(long, default_value = "30")]
        timeout: u64,
    },

    /// Print the notification a push payload produces
    Push {
        /// JSON payload, e.g. '{"title": "Salom"}' (default: empty push)
        payload: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    cloudstore::logging::init(&config.logging);

    match cli.command {
        Commands::Config { output } => {
            let content = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)
                        .with_context(|| format!("writing {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", content);
                }
            }
        }

        Commands::Route {
            url,
            method,
            navigate,
        } => {
            let request = if navigate {
                Request::navigate(&url)
            } else {
                Request::get(&url)
            }
            .with_method(&method);

            let routes = RouteTable::from_config(&config.service_worker);
            let strategy = routes.resolve(&request);
            println!("{} {} -> {}", request.method, request.url, strategy);
        }

        Commands::Precache { base_url, timeout } => {
            let base = Url::parse(&base_url).with_context(|| format!("invalid base URL {}", base_url))?;
            let fetcher = ReqwestFetcher::new(Duration::from_secs(timeout))?;
            let caches = MemoryCacheStorage::new();
            let sw_config = &config.service_worker;

            println!(
                "Pre-caching {} assets into {}",
                sw_config.precache.len(),
                sw_config.cache_name
            );

            match sw::precache(&caches, &sw_config.cache_name, &fetcher, &base, &sw_config.precache).await {
                Ok(assets) => {
                    println!("{:<6} {:>10}  {}", "Status", "Bytes", "URL");
                    println!("{}", "-".repeat(60));
                    for asset in &assets {
                        println!("{:<6} {:>10}  {}", asset.status, asset.bytes, asset.url);
                    }
                    let total: usize = assets.iter().map(|a| a.bytes).sum();
                    println!("\nInstall would succeed: {} assets, {}", assets.len(), format_bytes(total));
                }
                Err(e) => bail!("install would fail, nothing cached: {}", e),
            }
        }

        Commands::Push { payload } => {
            let notification = Notification::from_payload(
                PushPayload::parse(payload.as_deref()),
                &config.service_worker.notification,
            );
            println!("{}", serde_json::to_string_pretty(&notification)?);
        }
    }

    Ok(())
}

fn format_bytes(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
