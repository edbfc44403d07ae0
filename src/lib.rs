pub mod core;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use crate::core::config::AppConfig;
use crate::core::feed::types::{Feed, FetchOutcome};
use crate::core::feed::FeedService;
use crate::core::open_cache;
use crate::core::subscription::FeedList;

#[derive(Debug, Parser)]
#[command(name = "eatme-feeds")]
#[command(about = "Track food blog feeds and read their latest posts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the latest posts of every feed, or of one feed by name
    Fetch {
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Add a feed to the feed list
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        address: String,
    },
    /// Delete the feed with the given name
    Delete {
        #[arg(short, long)]
        name: String,
    },
    /// List all feeds
    List,
}

pub async fn run() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match execute(cli.command).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!(error = %error, "command failed");
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn execute(command: Commands) -> Result<String, String> {
    let config = AppConfig::from_env().map_err(|error| error.to_string())?;
    let mut feeds = FeedList::load(&config.feeds_file)
        .await
        .map_err(|error| error.to_string())?;

    match command {
        Commands::Fetch { name } => {
            let selected: Vec<Feed> = match name {
                Some(name) => vec![feeds
                    .find_by_name(&name)
                    .cloned()
                    .ok_or_else(|| format!("feed {name} not found"))?],
                None => feeds.feeds().to_vec(),
            };
            let cache = open_cache(&config)
                .await
                .map_err(|error| error.to_string())?;
            let service = FeedService::with_timeout(cache, config.http_timeout)
                .map_err(|error| error.to_string())?;
            let results = service.fetch_all(&selected).await;
            Ok(render_results(&results))
        }
        Commands::Add { name, address } => {
            let message = feeds
                .add_feed(Feed::new(name.trim(), address.trim()))
                .map_err(|error| error.to_string())?;
            feeds
                .save(&config.feeds_file)
                .await
                .map_err(|error| error.to_string())?;
            Ok(message)
        }
        Commands::Delete { name } => {
            let message = feeds
                .delete_feed(name.trim())
                .map_err(|error| error.to_string())?;
            feeds
                .save(&config.feeds_file)
                .await
                .map_err(|error| error.to_string())?;
            Ok(message)
        }
        Commands::List => Ok(render_feed_list(&feeds)),
    }
}

fn render_feed_list(feeds: &FeedList) -> String {
    if feeds.is_empty() {
        return "No feeds yet.".to_string();
    }
    feeds
        .feeds()
        .iter()
        .enumerate()
        .map(|(index, feed)| format!("{}. {feed}", index + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_results(results: &[(Feed, FetchOutcome)]) -> String {
    let mut blocks = Vec::with_capacity(results.len());
    for (feed, outcome) in results {
        let mut block = match outcome {
            FetchOutcome::Fetched(_) => format!("== {}", feed.name()),
            FetchOutcome::Cached(_) => format!("== {} (cached)", feed.name()),
            FetchOutcome::Empty => format!("== {} (unavailable)", feed.name()),
        };
        for post in outcome.posts() {
            block.push_str(&format!("\n- {}\n  {}", post.title, post.link));
        }
        blocks.push(block);
    }
    blocks.join("\n\n")
}
