//! Command line front end for the store scraper
//!
//! Prints every result as pretty JSON on stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use play_store_scraper::infrastructure::init_logging_with_config;
use play_store_scraper::{PaginationCursor, PlayStoreScraper, PriceFilter, RatingFilter, ScraperConfig};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "play_scraper")]
#[command(about = "Scrape Google Play listings, search results and app details")]
struct Cli {
    /// Configuration file (TOML); defaults to the platform config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimum spacing between requests, in milliseconds
    #[arg(long, global = true)]
    delay: Option<u64>,

    #[arg(long, global = true)]
    lang: Option<String>,

    #[arg(long, global = true)]
    country: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List category codes
    Categories,

    /// List known collection names
    Collections,

    /// Fetch one or more app detail pages
    App {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Fetch a collection listing
    List {
        collection: String,

        #[arg(long)]
        category: Option<String>,

        /// Fetch a single chunk starting here instead of the whole listing
        #[arg(long)]
        start: Option<String>,

        /// Chunk size for a single chunk
        #[arg(long)]
        num: Option<String>,

        /// Expand every summary into its detail page
        #[arg(long)]
        details: bool,
    },

    /// Search the store
    Search {
        query: String,

        /// all, free or paid
        #[arg(long, default_value = "all")]
        price: String,

        /// all or 4+
        #[arg(long, default_value = "all")]
        rating: String,

        #[arg(long)]
        details: bool,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to serialize output")?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ScraperConfig::load(cli.config.as_deref())?;
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    init_logging_with_config(config.logging.clone())?;

    let mut scraper = PlayStoreScraper::from_config(&config)?;
    let lang = cli.lang.as_deref();
    let country = cli.country.as_deref();

    match cli.command {
        Commands::Categories => print_json(&scraper.get_categories().await?)?,
        Commands::Collections => print_json(&scraper.collections())?,
        Commands::App { ids } => print_json(&scraper.get_apps(&ids, lang, country).await?)?,
        Commands::List {
            collection,
            category,
            start,
            num,
            details,
        } => {
            let category = category.as_deref();
            if start.is_none() && num.is_none() {
                if details {
                    print_json(&scraper.get_detail_list(&collection, category, lang, country).await?)?;
                } else {
                    print_json(&scraper.get_list(&collection, category, lang, country).await?)?;
                }
            } else {
                let cursor = PaginationCursor::parse(
                    start.as_deref().unwrap_or("0"),
                    num.as_deref().unwrap_or("60"),
                )?;
                let (start, num) = (i64::from(cursor.start()), i64::from(cursor.num()));
                if details {
                    let apps = scraper
                        .get_detail_list_chunk(&collection, category, start, num, lang, country)
                        .await?;
                    print_json(&apps)?;
                } else {
                    let apps = scraper
                        .get_list_chunk(&collection, category, start, num, lang, country)
                        .await?;
                    print_json(&apps)?;
                }
            }
        }
        Commands::Search {
            query,
            price,
            rating,
            details,
        } => {
            let price: PriceFilter = price.parse()?;
            let rating: RatingFilter = rating.parse()?;
            if details {
                print_json(&scraper.get_detail_search(&query, price, rating, lang, country).await?)?;
            } else {
                print_json(&scraper.get_search(&query, price, rating, lang, country).await?)?;
            }
        }
    }

    Ok(())
}
