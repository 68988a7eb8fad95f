// src/bin/cli/main.rs - dummyjson-suite CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dummyjson_suite::{
    recompute_cart_totals, CheckFilter, CredentialAcquirer, LineItem, LoginOptions, Runner,
    SuiteConfig,
};
use std::num::NonZeroU32;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dummyjson-suite")]
#[command(about = "End-to-end checks for the DummyJSON REST API")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Base URL of the service under test
    #[arg(long, env = "DUMMYJSON_BASE_URL")]
    base_url: Option<String>,

    /// Credentials fixture (JSON with username and password)
    #[arg(long, env = "DUMMYJSON_TEST_DATA")]
    test_data: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run checks
    Run {
        /// Only run checks carrying this tag (repeatable, all must match)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,

        /// Only run checks whose "<group> <check>" title contains this text
        #[arg(long)]
        grep: Option<String>,
    },
    /// List groups, checks and tags
    List,
    /// Log in and report the issued token pair
    Login {
        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        password: Option<String>,

        /// Requested token lifetime in minutes; omitted from the request when unset
        #[arg(long)]
        expires_in_mins: Option<NonZeroU32>,
    },
    /// Recompute cart totals from a JSON array of line items
    Totals {
        /// File holding `[{"price": .., "quantity": .., "discountPercentage": ..}]`
        file: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "dummyjson_suite=debug"
    } else {
        "dummyjson_suite=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<SuiteConfig> {
    let mut config = SuiteConfig::from_env().context("Failed to load configuration")?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(path) = &cli.test_data {
        config.test_data_path = Some(path.clone());
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Run { tags, grep } => {
            let config = load_config(&cli)?;
            let mut filter = CheckFilter::new();
            for tag in tags {
                filter = filter.tag(tag);
            }
            if let Some(text) = grep {
                filter = filter.grep(text.clone());
            }

            let runner = Runner::new(config)?.with_filter(filter);
            let report = runner.run().await;
            println!("{}", report);

            if !report.is_success() {
                error!(failed = report.failed(), "Some checks failed");
                std::process::exit(1);
            }
        }
        Commands::List => {
            let runner = Runner::new(load_config(&cli)?)?;
            for group in runner.groups() {
                println!("{}", group.full_title());
                for check in &group.checks {
                    let tags: Vec<String> = check.tags.iter().map(ToString::to_string).collect();
                    println!("  {} {}", check.title, tags.join(" "));
                }
            }
        }
        Commands::Login {
            username,
            password,
            expires_in_mins,
        } => {
            let config = load_config(&cli)?;
            let mut options = LoginOptions::from_test_data(&config.test_data()?);
            if let Some(username) = username {
                options = options.with_username(username.clone());
            }
            if let Some(password) = password {
                options = options.with_password(password.clone());
            }
            if let Some(minutes) = expires_in_mins {
                options = options.with_expires_in_mins(minutes.get());
            }

            let tokens = CredentialAcquirer::from_config(&config)
                .acquire(&options)
                .await
                .context("Login failed")?;
            info!(username = %options.username, "Logged in");
            println!("accessToken: {} chars", tokens.access_token.len());
            println!("refreshToken: {} chars", tokens.refresh_token.len());
        }
        Commands::Totals { file } => {
            let raw = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let items: Vec<LineItem> =
                serde_json::from_str(&raw).context("Expected a JSON array of line items")?;
            let totals = recompute_cart_totals(&items);
            println!("{}", serde_json::to_string_pretty(&totals)?);
        }
    }

    Ok(())
}
