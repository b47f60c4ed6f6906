//! Social-Archiver main entry point
//!
//! This is the command-line interface for the Reddit crawler and the YouTube
//! collectors.

use clap::{Args, Parser, Subcommand};
use social_archiver::config::{load_or_default, validate_run_config, RunConfig, ServiceConfig};
use social_archiver::crawler::crawl;
use social_archiver::youtube::{
    archive_comments, archive_transcripts, VideoQuery, COMMENT_ARCHIVE_FILE,
    TRANSCRIPT_RECORD_FILE,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Social-Archiver: archives forum and video content into spreadsheets
///
/// The `reddit` command walks a subreddit's history in laps, writing raw
/// records, a run metadata file and a workbook per run. The `youtube-*`
/// commands collect comments or transcripts of keyword search hits and
/// summarize them with a local language model.
#[derive(Parser, Debug)]
#[command(name = "social-archiver")]
#[command(version = "1.0.0")]
#[command(about = "Archives forum and video content into spreadsheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a subreddit's submissions and comments
    Reddit(RedditArgs),

    /// Collect the comments of videos matching a keyword
    YoutubeComments(VideoArgs),

    /// Collect the transcripts of videos matching a keyword
    YoutubeTranscripts(VideoArgs),
}

#[derive(Args, Debug)]
struct RedditArgs {
    /// Subreddit to crawl, without the `r/` prefix
    #[arg(value_name = "SUBREDDIT")]
    subreddit: String,

    /// Base directory for run output
    #[arg(long, default_value = "./data")]
    output_dir: String,

    /// Submissions requested per lap
    #[arg(long, default_value_t = 1000)]
    batch_size: usize,

    /// Number of laps
    #[arg(long, default_value_t = 3)]
    laps: u32,

    /// Reddit app client id
    #[arg(long, default_value = "")]
    reddit_id: String,

    /// Reddit app client secret (never written to disk)
    #[arg(long, default_value = "")]
    reddit_secret: String,

    /// Reddit username, used in the user agent
    #[arg(long, default_value = "")]
    reddit_username: String,

    /// Crawl towards newer submissions, starting after this epoch time
    #[arg(long, conflicts_with = "utc_before")]
    utc_after: Option<i64>,

    /// Crawl towards older submissions, starting before this epoch time
    #[arg(long)]
    utc_before: Option<i64>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Maximum collapsed comment nodes expanded per submission
    #[arg(long, default_value_t = 100)]
    comments_cap: usize,

    /// Path to TOML service configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// `params.yaml` of an earlier run to continue from
    #[arg(long, value_name = "FILE")]
    resume_from: Option<String>,

    /// Validate options and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

impl RedditArgs {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            subreddit: self.subreddit.clone(),
            output_dir: self.output_dir.clone(),
            batch_size: self.batch_size,
            laps: self.laps,
            reddit_id: self.reddit_id.clone(),
            reddit_secret: self.reddit_secret.clone(),
            reddit_username: self.reddit_username.clone(),
            utc_after: self.utc_after,
            utc_before: self.utc_before,
            debug: self.debug,
            comments_cap: self.comments_cap,
            resume_from: self.resume_from.clone(),
        }
    }
}

#[derive(Args, Debug)]
struct VideoArgs {
    /// Search keyword
    #[arg(long)]
    keyword: String,

    /// Maximum number of search hits to process
    #[arg(long, default_value_t = 25)]
    max_videos: u32,

    /// Remove duplicate search hits
    #[arg(long)]
    dedupe: bool,

    /// Destination workbook
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to TOML service configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl VideoArgs {
    fn query(&self) -> VideoQuery {
        VideoQuery {
            keyword: self.keyword.clone(),
            max_videos: self.max_videos,
            dedupe: self.dedupe,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let debug = matches!(&cli.command, Command::Reddit(args) if args.debug);
    setup_logging(cli.verbose.max(u8::from(debug)), cli.quiet);

    match cli.command {
        Command::Reddit(args) => handle_reddit(args).await,
        Command::YoutubeComments(args) => {
            let services = load_services(args.config.as_deref())?.0;
            let output = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(COMMENT_ARCHIVE_FILE));
            let rows = archive_comments(&services, &args.query(), &output).await?;
            println!("✓ {} comments exported to: {}", rows, output.display());
            Ok(())
        }
        Command::YoutubeTranscripts(args) => {
            let services = load_services(args.config.as_deref())?.0;
            let output = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(TRANSCRIPT_RECORD_FILE));
            let rows = archive_transcripts(&services, &args.query(), &output).await?;
            println!("✓ {} videos exported to: {}", rows, output.display());
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("social_archiver=info,warn"),
            1 => EnvFilter::new("social_archiver=debug,info"),
            2 => EnvFilter::new("social_archiver=trace,debug"),
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

fn load_services(
    path: Option<&Path>,
) -> Result<(ServiceConfig, Option<String>), Box<dyn std::error::Error>> {
    match path {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("No configuration file given, using default endpoints"),
    }

    match load_or_default(path) {
        Ok((config, hash)) => {
            if let Some(hash) = &hash {
                tracing::info!("Configuration loaded successfully (hash: {})", hash);
            }
            Ok((config, hash))
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the `reddit` command
async fn handle_reddit(args: RedditArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (services, config_hash) = load_services(args.config.as_deref())?;
    let config = args.run_config();

    if args.dry_run {
        return handle_dry_run(&config, &services);
    }

    match crawl(config, &services, config_hash).await {
        Ok(summary) => {
            tracing::info!("Crawl completed successfully");
            println!("✓ Run {} finished", summary.run_id);
            println!(
                "  Submissions: {}, Comments: {}",
                summary.totals.submissions, summary.totals.comments
            );
            println!(
                "  Window: {:?} .. {:?}",
                summary.window.lower, summary.window.upper
            );
            println!("  Workbook: {}", summary.workbook.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles `--dry-run`: validates the options and shows the planned crawl
fn handle_dry_run(
    config: &RunConfig,
    services: &ServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    validate_run_config(config)?;

    println!("=== Social-Archiver Dry Run ===\n");

    println!("Run Options:");
    println!("  Subreddit: r/{}", config.subreddit);
    println!("  Laps: {}", config.laps);
    println!("  Batch size: {}", config.batch_size);
    println!("  Comments cap: {}", config.comments_cap);
    match (config.utc_after, config.utc_before) {
        (Some(after), _) => println!("  Direction: newer, after {}", after),
        (_, Some(before)) => println!("  Direction: older, before {}", before),
        _ => println!("  Direction: older, before now"),
    }
    if let Some(path) = &config.resume_from {
        println!("  Resume from: {}", path);
    }

    println!("\nEndpoints:");
    println!("  Search: {}", services.reddit.search_url);
    if config.has_app_credentials() {
        println!("  Comments: {} (app token)", services.reddit.oauth_url);
    } else {
        println!("  Comments: {} (anonymous)", services.reddit.api_url);
    }

    println!("\nOutput:");
    println!("  Directory: {}/{}/<run id>", config.output_dir, config.subreddit);

    println!("\n✓ Options are valid");
    Ok(())
}
