//! Sumi-Scribe main entry point
//!
//! This is the command-line interface for the Sumi-Scribe site crawler.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::task::Poll;
use sumi_scribe::config::{resolve_config, Overrides};
use sumi_scribe::crawler::Coordinator;
use sumi_scribe::render::{ChromeSession, RenderSession};
use tracing_subscriber::EnvFilter;

/// Sumi-Scribe: crawl one website and save its pages as markdown
///
/// Sumi-Scribe renders every page in a headless browser, strips navigation
/// and other clutter, and writes the main content of each page to a
/// markdown file. It stays on the start URL's domain and stops after the
/// requested number of pages.
#[derive(Parser, Debug)]
#[command(name = "sumi-scribe")]
#[command(version = "1.0.0")]
#[command(about = "Crawl a website and save its pages as markdown", long_about = None)]
struct Cli {
    /// Start URL (https:// is added when no scheme is given)
    #[arg(value_name = "URL")]
    url: String,

    /// Maximum number of pages to crawl
    #[arg(value_name = "PAGES", allow_negative_numbers = true)]
    pages: i64,

    /// Delay between page fetches in seconds [default: 1.0]
    #[arg(long)]
    delay: Option<f64>,

    /// Number of pages fetched at the same time, 1 to 10 [default: 3]
    #[arg(long, allow_negative_numbers = true)]
    concurrent: Option<i64>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    gui: bool,

    /// Path to an optional TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let overrides = Overrides {
        max_pages: cli.pages,
        max_concurrent: cli.concurrent,
        delay: cli.delay,
        gui: cli.gui,
    };

    let config = match resolve_config(cli.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut coordinator = match Coordinator::new(&cli.url, config.clone()) {
        Ok(coordinator) => coordinator,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Listen for Ctrl-C before the browser exists so no interrupt skips teardown
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    // The handler is installed on first poll
    if let Poll::Ready(result) = futures::poll!(&mut ctrl_c) {
        return match result {
            Ok(()) => {
                tracing::warn!("Crawl interrupted by user");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("Cannot listen for Ctrl-C: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    tracing::debug!("Launching browser");
    let settings = config.browser.clone();
    let mut launch = tokio::spawn(async move { ChromeSession::launch(&settings).await });

    let (launched, interrupted) = tokio::select! {
        joined = &mut launch => (joined, false),
        _ = &mut ctrl_c => {
            tracing::warn!("Crawl interrupted by user, waiting for the browser to start before closing it");
            (launch.await, true)
        }
    };

    let session = match launched {
        Ok(Ok(session)) => Arc::new(session),
        Ok(Err(e)) if interrupted => {
            tracing::debug!("Browser failed to start after interrupt: {}", e);
            return ExitCode::SUCCESS;
        }
        Ok(Err(e)) => {
            tracing::error!("Failed to start browser: {}", e);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            tracing::error!("Browser launch task failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let code = if interrupted {
        ExitCode::SUCCESS
    } else {
        // Dropping the crawl on interrupt aborts its in-flight fetch tasks
        tokio::select! {
            result = coordinator.run(Arc::clone(&session) as Arc<dyn RenderSession>) => match result {
                Ok(_) => ExitCode::SUCCESS,
                Err(e) => {
                    tracing::error!("Crawl failed: {}", e);
                    ExitCode::FAILURE
                }
            },
            _ = &mut ctrl_c => {
                tracing::warn!("Crawl interrupted by user");
                ExitCode::SUCCESS
            }
        }
    };

    // Always release the browser, whether the crawl finished or not
    session.shutdown().await;

    code
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_scribe=info,warn"),
            1 => EnvFilter::new("sumi_scribe=debug,info"),
            2 => EnvFilter::new("sumi_scribe=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
