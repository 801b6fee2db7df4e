//! BookLens: review batch ingestion and word-cloud aggregation.
//!
//! Entry point that wires configuration, the document store, the blob
//! store, the upload queue, and the services, then drives ingestion from
//! the command line.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use booklens_core::config::AppConfig;
use booklens_core::error::AppError;
use booklens_core::traits::{BlobStore, EnrichmentEngine};
use booklens_pipeline::{BatchProcessor, HttpEnrichmentClient, UploadQueue};
use booklens_service::{CloudService, UploadService};
use booklens_storage::LocalBlobStore;
use booklens_store::DocumentStore;

#[derive(Parser)]
#[command(name = "booklens", version, about = "Review batch ingestion and word-cloud aggregation")]
struct Cli {
    /// Configuration file path.
    #[arg(long, default_value = "config/default.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest review CSV files and wait for the queue to drain.
    Ingest {
        /// CSV files to submit, in order.
        files: Vec<PathBuf>,

        /// Print the global word cloud once ingestion finishes.
        #[arg(long)]
        global_cloud: bool,

        /// Print the tag cloud and sentiment stats for a book id.
        #[arg(long)]
        book: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config, cli.command).await {
        tracing::error!("booklens error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment.
fn load_configuration(cli_path: &str) -> Result<AppConfig, AppError> {
    let config_path = std::env::var("BOOKLENS_CONFIG").unwrap_or_else(|_| cli_path.to_string());
    AppConfig::load(&config_path)
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig, command: Command) -> Result<(), AppError> {
    tracing::info!("Starting BookLens v{}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(DocumentStore::new());
    let blobs: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(&config.storage.root).await?);
    let engine: Arc<dyn EnrichmentEngine> =
        Arc::new(HttpEnrichmentClient::new(&config.enrichment)?);

    let processor = BatchProcessor::new(
        Arc::clone(&store),
        Arc::clone(&blobs),
        engine,
        config.pipeline.clone(),
    );
    let queue = UploadQueue::new(Arc::clone(&store), Arc::new(processor));
    let uploads = UploadService::new(Arc::clone(&store), blobs, queue);
    let clouds = CloudService::new(Arc::clone(&store), config.cache.clone());

    let recovered = uploads.recover_stranded().await?;
    if recovered > 0 {
        tracing::warn!(recovered, "failed stranded processing jobs at startup");
    }

    match command {
        Command::Ingest {
            files,
            global_cloud,
            book,
        } => ingest(&uploads, &clouds, files, global_cloud, book).await,
    }
}

async fn ingest(
    uploads: &UploadService,
    clouds: &CloudService,
    files: Vec<PathBuf>,
    global_cloud: bool,
    book: Option<String>,
) -> Result<(), AppError> {
    if files.is_empty() {
        return Err(AppError::validation("no files given to ingest"));
    }

    for path in &files {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.csv")
            .to_string();
        let data = tokio::fs::read(path).await.map_err(|e| {
            AppError::validation(format!("failed to read {}: {e}", path.display()))
        })?;

        match uploads.submit(&filename, data.into()).await {
            Ok(job) => tracing::info!(
                job_id = %job.id,
                filename = %job.filename,
                position = ?job.queue_position,
                "submitted"
            ),
            Err(e) => tracing::error!(filename, error = %e, "submission rejected"),
        }
    }

    uploads.wait_idle().await;

    for job in uploads.list().into_iter().rev() {
        println!(
            "{}  {:<24} {:>10}  {}  {}/{} records{}",
            job.id,
            job.filename,
            job.size_formatted(),
            job.status,
            job.processed_records,
            job.total_records,
            job.error_message
                .as_deref()
                .map(|m| format!("  ({m})"))
                .unwrap_or_default(),
        );
    }

    if global_cloud {
        let tags = clouds.global_cloud().await?;
        println!("{}", serde_json::to_string_pretty(&tags)?);
    }

    if let Some(book_id) = book {
        let tags = clouds.book_cloud(&book_id).await?;
        let stats = clouds.sentiment_stats(&book_id);
        println!("{}", serde_json::to_string_pretty(&tags)?);
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }

    Ok(())
}
