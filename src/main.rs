//! Game review search CLI - collects review snippets for a game title.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use game_review_search::{
    board::{BoardCrawler, DEFAULT_MAX_PAGES, DEFAULT_MONTHS_BACK},
    comments::CommentScraper, fetcher_http::HttpFetcher, write_records, Bedrock, Config, Crawler,
    LlmClient, ReviewRecord, SerpApi, DEFAULT_OUTPUT_FILE,
};

/// Generates review sites and keywords with an LLM, then collects matching
/// search results into a JSON file.
#[derive(Parser)]
#[command(name = "game-review-search")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Game title to collect reviews for
    #[arg(short, long, default_value = "로드나인")]
    game: String,

    /// Number of results requested per search query
    #[arg(short = 'n', long, default_value = "5")]
    results_per_query: u32,

    /// Search engines to use (comma-separated), e.g. google,naver
    #[arg(short, long, value_delimiter = ',', default_value = "google")]
    engines: Vec<String>,

    /// Output file
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Fetch each result page and split records per user comment
    #[arg(long)]
    with_comments: bool,

    /// Crawl this board list URL directly instead of searching
    #[arg(long)]
    board: Option<String>,

    /// Keep board posts written within this many months
    #[arg(long, default_value_t = DEFAULT_MONTHS_BACK)]
    months_back: u32,

    /// Number of board list pages to walk
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: u32,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    if let Some(board) = &cli.board {
        if let Err(e) = run_board(&cli, board).await {
            error!("Board crawl failed: {}", e);
            println!("Board crawl failed, no results collected: {}", e);
        }
        return Ok(());
    }

    // Missing credentials are fatal.
    let config = Config::from_env()?;

    if let Err(e) = run(&cli, &config).await {
        error!("Run failed: {}", e);
        println!("Error during run: {}", e);
    }
    Ok(())
}

async fn run(cli: &Cli, config: &Config) -> Result<()> {
    let llm = LlmClient::new(Bedrock::new(config)?);
    let sites = llm.generate_sites().await?;
    let keywords = llm.generate_keywords(&cli.game).await?;
    println!("Generated sites: {:?}", sites);
    println!("Generated keywords: {:?}", keywords);

    let crawler = Crawler::new(SerpApi::new(config)?)
        .with_engines(cli.engines.clone())
        .with_results_per_query(cli.results_per_query);

    let records = match crawler.crawl(&sites, &keywords).await {
        Ok(records) => records,
        Err(e) => {
            error!("Crawl aborted: {}", e);
            println!("Search failed, no results collected: {}", e);
            return Ok(());
        }
    };

    let records = if cli.with_comments {
        CommentScraper::new(HttpFetcher::new()?).enrich(records).await
    } else {
        records
    };

    save(&records, cli)?;
    Ok(())
}

async fn run_board(cli: &Cli, board: &str) -> Result<()> {
    let crawler = BoardCrawler::new(HttpFetcher::new()?, board)?
        .with_months_back(cli.months_back)
        .with_max_pages(cli.max_pages);

    let records = crawler.crawl(Local::now().date_naive()).await?;
    save(&records, cli)?;
    Ok(())
}

fn save(records: &[ReviewRecord], cli: &Cli) -> Result<()> {
    write_records(records, &cli.output)?;
    info!("Saved {} records", records.len());
    println!("Search complete! Results saved to {}", cli.output.display());
    println!("Collected {} reviews in total.", records.len());
    Ok(())
}
