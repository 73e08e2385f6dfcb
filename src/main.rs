use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use wastesort_lib::database::{self, catalog_repo, DEFAULT_DATABASE_URL};
use wastesort_lib::services::config::ConfigService;
use wastesort_lib::services::matcher::{
    shared_store, CancelToken, Identifier, JsonFileLabels, MatchTables, MemoryCatalog,
    SqliteCatalogStore,
};
use wastesort_lib::{DATABASE_URL_ENV, TABLES_PATH_ENV};

#[derive(Parser, Debug)]
#[command(name = "wastesort", version, about = "Match AI waste labels to disposal categories")]
struct Cli {
    /// SQLite catalog database
    #[arg(long, global = true, env = DATABASE_URL_ENV, default_value = DEFAULT_DATABASE_URL)]
    database_url: String,

    /// JSON file overriding the built-in match tables
    #[arg(long, global = true, env = TABLES_PATH_ENV)]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Identify an item from a labels JSON file and print the result
    Identify { labels: PathBuf },
    /// Load catalog rows from a JSON file into the database
    Import {
        catalog: PathBuf,
        /// Delete existing rows first
        #[arg(long)]
        replace: bool,
    },
    /// Print the effective engine settings
    Settings,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let pool = database::connect(&cli.database_url)
        .await
        .with_context(|| format!("opening {}", cli.database_url))?;

    match cli.command {
        Command::Identify { labels } => {
            let tables = match &cli.tables {
                Some(path) => MatchTables::from_file(path)
                    .with_context(|| format!("loading tables from {}", path.display()))?,
                None => MatchTables::default(),
            };
            let settings = ConfigService::init(pool.clone()).await.get_settings();
            let store = shared_store(SqliteCatalogStore::new(pool), settings.search_cache_capacity);
            let identifier = Identifier::new(store, Arc::new(tables), settings);

            let cancel = CancelToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::warn!("[Cli] Interrupted; cancelling identification");
                    on_interrupt.cancel();
                }
            });

            let result = identifier
                .identify_from_source(&JsonFileLabels::new(labels), &cancel)
                .await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Import { catalog, replace } => {
            let raw = std::fs::read_to_string(&catalog)
                .with_context(|| format!("reading {}", catalog.display()))?;
            let parsed = MemoryCatalog::from_json(&raw)?;
            if replace {
                let removed = catalog_repo::clear_entries(&pool).await?;
                log::info!("[Import] Removed {removed} existing entries");
            }
            catalog_repo::insert_entries(&pool, &parsed.entries).await?;
            let total = catalog_repo::count_entries(&pool).await?;
            log::info!("[Import] Imported {} entries ({total} in catalog)", parsed.len());
        }
        Command::Settings => {
            let settings = ConfigService::init(pool).await.get_settings();
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}
