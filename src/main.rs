use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use fixer_core::config::Config;
use s3_format_fixer::{batch, BatchOptions, EnvelopeCodec, EpochUnit, ObjectStoreRecords};

#[derive(Parser)]
#[command(
    name = "s3-format-fixer",
    about = "Rewrite quasi-JSON SNS records in a bucket as strict JSON"
)]
struct Cli {
    /// Bucket holding the records.
    bucket: String,

    /// Only repair keys starting with this prefix [config: store.prefix].
    #[arg(long)]
    prefix: Option<String>,

    /// AWS region of the bucket [config: store.region].
    #[arg(long)]
    region: Option<String>,

    /// Treat BUCKET as a subdirectory of this local directory instead of S3.
    #[arg(long)]
    local_root: Option<PathBuf>,

    /// Repair and report without writing anything back.
    #[arg(long)]
    dry_run: bool,

    /// Records processed at once [config: batch.concurrency].
    #[arg(long, value_parser = at_least_one())]
    concurrency: Option<usize>,

    /// Stop listing after this many keys [config: store.max_keys].
    #[arg(long, value_parser = at_least_one())]
    max_keys: Option<usize>,

    /// Epoch unit for the rewritten timestamp: millis or nanos.
    #[arg(long)]
    timestamp_unit: Option<EpochUnit>,

    /// Config file to use instead of ~/.config/s3-format-fixer/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log every record at debug level.
    #[arg(long)]
    debug: bool,
}

fn at_least_one() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::<usize>::new().range(1..)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("unable to load config {}", path.display()))?,
        None => Config::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "falling back to built-in config defaults");
            Config::defaults()
        }),
    };

    let prefix = cli.prefix.unwrap_or(config.store.prefix);
    let region = cli.region.unwrap_or(config.store.region);
    let max_keys = cli.max_keys.or(config.store.max_keys);
    let options = BatchOptions {
        codec: EnvelopeCodec::new(cli.timestamp_unit.unwrap_or(config.codec.timestamp_unit)),
        concurrency: cli.concurrency.unwrap_or(config.batch.concurrency),
        dry_run: cli.dry_run || config.batch.dry_run,
    };

    let store = match &cli.local_root {
        Some(root) => ObjectStoreRecords::local(root.join(&cli.bucket))
            .with_context(|| format!("unable to open local bucket {}", root.join(&cli.bucket).display()))?,
        None => ObjectStoreRecords::s3(&cli.bucket, &region)
            .with_context(|| format!("unable to open bucket {:?} in {region}", cli.bucket))?,
    }
    .with_max_keys(max_keys);

    let report = batch::run(Arc::new(store), &prefix, &options).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.failed.is_empty() {
        anyhow::bail!(
            "{} of {} records failed",
            report.failed.len(),
            report.listed
        );
    }
    Ok(())
}
