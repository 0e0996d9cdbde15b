use std::path::PathBuf;

use clap::Parser;

use crate::crawler::ListingKind;
use crate::crawler::pager::DETAIL_FETCH_CONCURRENCY;

#[derive(Parser, Debug, Clone)]
#[command(name = "jobboard", about = "Job board listing crawler")]
pub struct Config {
    /// Database connection URL (required for the database sink)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Where crawled records are persisted
    #[arg(long, env = "CRAWL_SINK", value_enum, default_value = "csv")]
    pub sink: SinkMode,

    /// Directory the CSV sink writes into
    #[arg(long, env = "CRAWL_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Maximum simultaneous detail-page fetches per listing page
    #[arg(long, env = "DETAIL_CONCURRENCY", default_value_t = DETAIL_FETCH_CONCURRENCY)]
    pub detail_concurrency: usize,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkMode {
    Csv,
    Database,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the web server (default when no subcommand given)
    Serve {
        /// Listen address
        #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
        listen_addr: String,
    },
    /// Run a single crawl and print its summary
    Crawl {
        /// Listing type to crawl
        #[arg(long, value_enum, default_value = "recruit")]
        profile: ListingKind,

        /// Search keyword for keyword-driven profiles
        #[arg(long)]
        keyword: Option<String>,

        /// Number of listing pages to visit
        #[arg(long)]
        pages: Option<u32>,
    },
}

impl Config {
    /// Resolve the command, defaulting to Serve if none specified.
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve {
            listen_addr: std::env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        })
    }
}
