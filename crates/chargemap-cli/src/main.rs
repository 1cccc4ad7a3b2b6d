mod ingest;
mod query;
mod source;

use std::path::PathBuf;

use anyhow::Context;
use chargemap_core::AppConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::ingest::IngestArgs;
use crate::source::FeedSource;

#[derive(Debug, Parser)]
#[command(name = "chargemap-cli")]
#[command(about = "Charging-station directory command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load an operator feed and upsert its stations
    Ingest {
        /// Feed file to read (defaults to CHARGEMAP_FEED_PATH)
        #[arg(long, conflicts_with = "url")]
        file: Option<PathBuf>,
        /// Download the feed from this URL instead of reading a file
        #[arg(long)]
        url: Option<String>,
        /// Only write the first N unique stations
        #[arg(long)]
        max_stations: Option<usize>,
        /// Stations per concurrent upsert batch
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        batch_size: Option<u32>,
        /// Delete every stored station before ingesting
        #[arg(long, conflicts_with = "dry_run")]
        reset: bool,
        /// Run the pipeline against an in-memory store
        #[arg(long)]
        dry_run: bool,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Print the partition key for a postal code
    Partition { postal_code: String },
    /// Read stations back out of the store
    Query {
        #[command(subcommand)]
        command: QueryCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Ping,
    Migrate,
    /// Delete every stored station
    Reset,
}

#[derive(Debug, Subcommand)]
enum QueryCommands {
    /// One page of a partition
    Partition {
        partition_key: String,
        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        page: i64,
        #[arg(long, allow_negative_numbers = true)]
        page_size: Option<i64>,
    },
    /// One page of the partition a postal code belongs to
    Postal {
        postal_code: String,
        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        page: i64,
        #[arg(long, allow_negative_numbers = true)]
        page_size: Option<i64>,
    },
    /// A single station by id
    Station { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("chargemap-cli: no command given; see --help");
        return Ok(());
    };

    match command {
        Commands::Partition { postal_code } => query::run_partition(&postal_code),
        Commands::Ingest {
            file,
            url,
            max_stations,
            batch_size,
            reset,
            dry_run,
        } => {
            let config = load_config()?;
            let args = IngestArgs {
                source: FeedSource::resolve(file, url, &config.feed_path),
                max_stations,
                batch_size: batch_size.and_then(|n| usize::try_from(n).ok()),
                reset,
                dry_run,
            };
            ingest::run_ingest(&config, args).await?;
        }
        Commands::Db { command } => run_db(&load_config()?, command).await?,
        Commands::Query { command } => {
            let config = load_config()?;
            match command {
                QueryCommands::Partition {
                    partition_key,
                    page,
                    page_size,
                } => {
                    query::run_query_partition(&config, &partition_key, page, page_size).await?;
                }
                QueryCommands::Postal {
                    postal_code,
                    page,
                    page_size,
                } => query::run_query_postal(&config, &postal_code, page, page_size).await?,
                QueryCommands::Station { id } => query::run_query_station(&config, &id).await?,
            }
        }
    }

    Ok(())
}

async fn run_db(config: &AppConfig, command: DbCommands) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    match command {
        DbCommands::Ping => {
            chargemap_db::health_check(&pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = chargemap_db::run_migrations(&pool).await?;
            println!("applied {applied} migrations");
        }
        DbCommands::Reset => {
            let deleted = chargemap_db::delete_all_stations(&pool).await?;
            println!("deleted {deleted} stations");
        }
    }
    Ok(())
}

/// Open a pool using the configured connection settings.
pub(crate) async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = chargemap_db::PoolConfig::from_app_config(config);
    chargemap_db::connect_pool(&config.database_url, pool_config)
        .await
        .context("failed to connect to database")
}

/// Load configuration and start logging. `partition` needs neither.
fn load_config() -> anyhow::Result<AppConfig> {
    let config = chargemap_core::load_app_config_from_env()?;
    init_tracing(&config);
    Ok(config)
}

// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
