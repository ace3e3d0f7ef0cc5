use clap::Parser;
use miette::{IntoDiagnostic, Result};
use momo_guard::application::MessagePipeline;
use momo_guard::config::GuardConfig;
use momo_guard::domain::ports::RecordStoreBox;
use momo_guard::infrastructure::in_memory::InMemoryRecordStore;
use momo_guard::interfaces::csv::{MessageReader, OutcomeWriter};
use momo_guard::logging::{LogFormat, init_logging};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input messages CSV file (sender,timestamp,text)
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// JSON file overriding the default thresholds
    #[arg(long)]
    config: Option<PathBuf>,

    /// Default log filter when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format).into_diagnostic()?;

    let config = match &cli.config {
        Some(path) => GuardConfig::from_json_file(path).into_diagnostic()?,
        None => GuardConfig::default(),
    };

    let store = open_store(cli.db_path).await?;
    let mut pipeline = MessagePipeline::new(&config, store);

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = MessageReader::new(file);
    let stdout = io::stdout();
    let mut writer = OutcomeWriter::new(stdout.lock());

    for message_result in reader.messages() {
        match message_result {
            Ok(message) => match pipeline.process(message.clone()).await {
                Ok(outcome) => writer.write_outcome(&message, &outcome).into_diagnostic()?,
                Err(e) => {
                    error!(sender = message.sender(), error = %e, "message not processed");
                    eprintln!("Error processing message: {}", e);
                }
            },
            Err(e) => {
                eprintln!("Error reading message: {}", e);
            }
        }
    }

    writer.finish().into_diagnostic()?;

    let stats = pipeline.stats();
    info!(
        phones = stats.phones_tracked,
        hashes = stats.total_hashes,
        "run complete"
    );
    Ok(())
}

#[cfg(feature = "storage-rocksdb")]
async fn open_store(db_path: Option<PathBuf>) -> Result<RecordStoreBox> {
    use momo_guard::config::RetryConfig;
    use momo_guard::infrastructure::rocksdb::RocksDBRecordStore;
    use momo_guard::recovery::RetryExecutor;

    let Some(db_path) = db_path else {
        return Ok(Box::new(InMemoryRecordStore::new()));
    };

    // Another process may still be releasing the lock file.
    let store = RetryExecutor::new(RetryConfig::for_startup())
        .run("open record store", || {
            let path = db_path.clone();
            async move { RocksDBRecordStore::open(path) }
        })
        .await
        .into_diagnostic()?;
    info!(path = %db_path.display(), "using RocksDB record store");
    Ok(Box::new(store))
}

#[cfg(not(feature = "storage-rocksdb"))]
async fn open_store(db_path: Option<PathBuf>) -> Result<RecordStoreBox> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Box::new(InMemoryRecordStore::new()))
}
