//! island-scrape — entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use island_scrape::{HttpFetcher, Pipeline, RequestContext};
use island_scrape_server::config::{ConfigOverrides, ServerConfig};
use island_scrape_server::logging::{self, LogFormat};

#[derive(Parser)]
#[command(
    name = "island-scrape",
    about = "Extract a product record from a storefront page's embedded JSON data",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Fetch and pacing options shared by `serve` and `extract`.
#[derive(Args, Default)]
struct FetchArgs {
    /// Minimum delay before each fetch, in milliseconds.
    #[arg(long)]
    min_delay_ms: Option<u64>,

    /// Maximum delay before each fetch, in milliseconds.
    #[arg(long)]
    max_delay_ms: Option<u64>,

    /// Disable the delay before each fetch.
    #[arg(long)]
    no_delay: bool,

    /// Request timeout in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Fixed user-agent instead of a random one per request.
    #[arg(long)]
    user_agent: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP service (default).
    Serve {
        /// Listen address (host:port).
        #[arg(long)]
        addr: Option<String>,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Scrape one URL and print the product as JSON.
    Extract {
        /// Product page URL.
        url: String,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Run extraction over a saved HTML file without touching the network.
    Parse {
        /// Path to the HTML file.
        file: PathBuf,

        /// URL the page was requested from.
        #[arg(long)]
        url: String,

        /// URL the page resolved to, if it was redirected.
        #[arg(long)]
        resolved_url: Option<String>,
    },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   island-scrape completions bash > ~/.local/share/bash-completion/completions/island-scrape
    ///   island-scrape completions zsh > ~/.zfunc/_island-scrape
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

fn overrides(addr: Option<String>, fetch: FetchArgs) -> ConfigOverrides {
    ConfigOverrides {
        addr,
        min_delay_ms: fetch.min_delay_ms,
        max_delay_ms: fetch.max_delay_ms,
        timeout_ms: fetch.timeout_ms,
        user_agent: fetch.user_agent,
        no_delay: fetch.no_delay,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_format)?;

    match cli.command.unwrap_or(Commands::Serve {
        addr: None,
        fetch: FetchArgs::default(),
    }) {
        Commands::Serve { addr, fetch } => {
            let config = ServerConfig::resolve(overrides(addr, fetch))?;
            tracing::info!("island-scrape v{}", env!("CARGO_PKG_VERSION"));
            island_scrape_server::serve(config).await?;
        }

        Commands::Extract { url, fetch } => {
            let config = ServerConfig::resolve(overrides(None, fetch))?;
            let fetcher = HttpFetcher::new(config.fetcher)?;
            let pipeline = Pipeline::new(Arc::new(fetcher), config.pacing);
            match pipeline.run(&url).await {
                Ok(product) => println!("{}", serde_json::to_string_pretty(&product)?),
                Err(e) => {
                    eprintln!("Error [{}]: {e}", e.code());
                    std::process::exit(1);
                }
            }
        }

        Commands::Parse {
            file,
            url,
            resolved_url,
        } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let ctx = RequestContext {
                resolved_url: resolved_url.unwrap_or_else(|| url.clone()),
                requested_url: url,
            };
            match Pipeline::process_html(&html, &ctx) {
                Ok(product) => println!("{}", serde_json::to_string_pretty(&product)?),
                Err(e) => {
                    eprintln!("Error [{}]: {e}", e.code());
                    std::process::exit(1);
                }
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "island-scrape", &mut std::io::stdout());
        }
    }

    Ok(())
}
