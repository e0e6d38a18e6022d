mod config;
mod filter;
mod keymap;
mod s3;
mod scheduler;

use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use config::Config;
use keymap::UploadMode;
use s3::S3Client;
use scheduler::{DEFAULT_WORKERS, run_upload};

#[derive(Parser, Debug)]
#[command(
    name = "s3push",
    version = env!("CARGO_PKG_VERSION"),
    about = "Upload a file or directory tree to AWS S3",
    long_about = "Uploads a local file or a whole directory tree to an S3 bucket, mapping paths \
                  to object keys, setting per-file Content-Type and cache headers, and running \
                  transfers across a bounded worker pool. Configure the bucket via .env.",
    after_help = "Examples:\n  \
                  s3push src                      # Upload src's contents to the bucket root\n  \
                  s3push src /images              # Upload src's contents under /images\n  \
                  s3push dist /v1.0.0 --include-root   # Upload as /v1.0.0/dist/...\n  \
                  s3push file.txt /docs/          # Upload a single file into /docs\n  \
                  s3push report.pdf /docs/final.pdf    # Upload and rename\n\n\
                  Configuration (.env):\n  \
                  AWS_REGION=us-west-2\n  \
                  S3_BUCKET=my-bucket"
)]
struct Cli {
    /// Local file or directory to upload
    source: PathBuf,

    /// Destination path inside the bucket
    #[arg(default_value = "/")]
    destination: String,

    /// Keep the source directory's own name as the first key segment
    /// (like `cp src dst` instead of `cp -r src/* dst`)
    #[arg(long)]
    include_root: bool,

    /// Maximum number of concurrent uploads
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file early to get LOG_LEVEL
    dotenv::dotenv().ok();

    // Initialize tracing/logging with support for LOG_LEVEL from .env
    let log_level = std::env::var("LOG_LEVEL")
        .ok()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let mode = if cli.include_root {
        UploadMode::WholeTree
    } else {
        UploadMode::ContentsOnly
    };

    info!("s3push v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    let client = S3Client::new(config).await?;

    println!(
        "{}",
        style(format!("Target: s3://{}", client.bucket()))
            .cyan()
            .bold()
    );

    match run_upload(
        Arc::new(client),
        &cli.source,
        &cli.destination,
        mode,
        cli.workers,
    )
    .await
    {
        Ok(true) => {
            println!("{}", style("Upload complete").green().bold());
            Ok(())
        }
        Ok(false) => {
            println!("{}", style("Upload failed").red().bold());
            std::process::exit(1);
        }
        Err(e) => {
            error!("{e}");
            println!("{} {}", style("✗").red(), style(e).red());
            std::process::exit(1);
        }
    }
}
