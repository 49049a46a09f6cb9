//! # ShopEase CLI
//!
//! Operator front end for the ShopEase point of sale.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  main                                                                   │
//! │    │                                                                    │
//! │    ├─► Cli::parse()                                                     │
//! │    ├─► init_tracing()              (stderr, RUST_LOG or default filter) │
//! │    └─► run(cli)                                                         │
//! │          │                                                              │
//! │          ├─► AppConfig::load       (file → SHOPEASE_* env → validate)   │
//! │          ├─► --data overrides the store path                            │
//! │          ├─► DocumentStore::new + initialize                            │
//! │          │     (skipped for `data clear` / `data import`)               │
//! │          └─► commands::dispatch                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Command output goes to stdout, logs to stderr, so `--json` output can be
//! piped as is.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

use shopease_store::{DocumentStore, StoreConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::Context;
use crate::config::AppConfig;
use crate::error::CliResult;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,shopease=debug";

/// Installs the stderr log subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads configuration, opens the store and runs one command.
pub async fn run(cli: Cli) -> CliResult<()> {
    let mut config = AppConfig::load(cli.config.clone())?;
    if let Some(path) = &cli.data {
        config = config.with_data_path(path);
    }

    let path = config.data_path()?;
    debug!(path = %path.display(), "Using store file");

    let store = DocumentStore::new(StoreConfig::new(path).pretty(config.storage.pretty));
    let created = if cli.command.needs_initialized_store() {
        store.initialize().await?
    } else {
        false
    };
    if created {
        info!(location = %store.location(), "Created new store");
    }

    let ctx = Context::new(store, config, cli.json);
    commands::dispatch(&ctx, cli.command, created).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("shopease").chain(args.iter().copied())).unwrap()
    }

    #[tokio::test]
    async fn test_run_creates_store_file() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        let data = dir.path().join("nested").join("shop.json");
        let data_arg = data.to_str().unwrap();
        let config_arg = config.to_str().unwrap();

        run(parse(&["--config", config_arg, "--data", data_arg, "init"]))
            .await
            .unwrap();
        assert!(data.exists());

        run(parse(&[
            "--config", config_arg, "--data", data_arg, "customer", "add", "Ayesha",
        ]))
        .await
        .unwrap();

        let store = DocumentStore::open(StoreConfig::new(&data)).await.unwrap();
        assert_eq!(store.customers().count().await.unwrap(), 1);
        assert_eq!(store.users().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_corrupted_store_is_reported() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        let data = dir.path().join("shop.json");
        std::fs::write(&data, b"not json").unwrap();

        let err = run(parse(&[
            "--config",
            config.to_str().unwrap(),
            "--data",
            data.to_str().unwrap(),
            "product",
            "list",
        ]))
        .await
        .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::StorageError);

        run(parse(&[
            "--config",
            config.to_str().unwrap(),
            "--data",
            data.to_str().unwrap(),
            "data",
            "clear",
            "--yes",
        ]))
        .await
        .unwrap();
    }
}
