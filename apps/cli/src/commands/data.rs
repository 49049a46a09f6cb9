//! # Data Commands
//!
//! Whole-document backup and recovery.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  export  ──► shopease-backup-YYYY-MM-DD.json (pretty JSON)           │
//! │  import  ◄── any snapshot file; checked in full before it replaces   │
//! │              the current document, metadata kept as exported         │
//! │  clear   ──► empty document + default users (needs --yes)            │
//! │  info    ──► location, size on disk, record counts                   │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `import` and `clear` run without opening the store first, so they can
//! replace a document that no longer parses.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde::Serialize;
use shopease_store::{Document, DocumentStore};
use std::path::PathBuf;
use tracing::info;

use crate::commands::Context;
use crate::error::{CliError, CliResult};

#[derive(Debug, Subcommand)]
pub enum DataCommand {
    /// Write a snapshot of the whole store
    Export {
        /// Defaults to shopease-backup-<today>.json in the current directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the store with a snapshot
    Import { file: PathBuf },
    /// Delete everything and start over with the default users
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Where the store lives and what it holds
    Info,
}

/// Record counts per collection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Counts {
    products: usize,
    sales: usize,
    employees: usize,
    customers: usize,
    attendance: usize,
    stock_movements: usize,
    users: usize,
}

impl From<&Document> for Counts {
    fn from(doc: &Document) -> Self {
        Counts {
            products: doc.products.len(),
            sales: doc.sales.len(),
            employees: doc.employees.len(),
            customers: doc.customers.len(),
            attendance: doc.attendance.len(),
            stock_movements: doc.stock_movements.len(),
            users: doc.users.len(),
        }
    }
}

impl Counts {
    fn rows(&self) -> [(&'static str, usize); 7] {
        [
            ("products", self.products),
            ("sales", self.sales),
            ("employees", self.employees),
            ("customers", self.customers),
            ("attendance", self.attendance),
            ("stockMovements", self.stock_movements),
            ("users", self.users),
        ]
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StoreInfo {
    location: String,
    size_bytes: u64,
    version: String,
    last_modified: Option<DateTime<Utc>>,
    counts: Counts,
}

#[derive(Debug, Serialize)]
struct Transfer {
    file: PathBuf,
    bytes: usize,
    counts: Counts,
}

pub async fn handle(ctx: &Context, cmd: DataCommand) -> CliResult<()> {
    match cmd {
        DataCommand::Export { out } => {
            let file = out.unwrap_or_else(|| {
                PathBuf::from(DocumentStore::snapshot_file_name(Utc::now().date_naive()))
            });
            let bytes = ctx.store.export_snapshot().await?;
            tokio::fs::write(&file, &bytes).await?;

            let document = ctx.store.load().await?.unwrap_or_default();
            let result = Transfer {
                file,
                bytes: bytes.len(),
                counts: Counts::from(&document),
            };
            ctx.emit(&result, |ctx, t| {
                ctx.line(format!("✓ Exported {} bytes to {}", t.bytes, t.file.display()));
            })
        }
        DataCommand::Import { file } => {
            let bytes = tokio::fs::read(&file).await?;
            let document = ctx.store.import_snapshot(&bytes).await?;
            info!(file = %file.display(), "Snapshot imported from file");

            let result = Transfer {
                file,
                bytes: bytes.len(),
                counts: Counts::from(&document),
            };
            ctx.emit(&result, |ctx, t| {
                ctx.line(format!("✓ Imported {}", t.file.display()));
                for (name, count) in t.counts.rows() {
                    ctx.line(format!("  {:<15} {:>6}", name, count));
                }
            })
        }
        DataCommand::Clear { yes } => {
            if !yes {
                return Err(CliError::validation(
                    "clearing deletes every record; re-run with --yes to confirm",
                ));
            }
            ctx.store.clear().await?;
            ctx.emit(&ctx.store.location(), |ctx, location| {
                ctx.line(format!("✓ Cleared {}; default users restored", location))
            })
        }
        DataCommand::Info => {
            let document = ctx.store.load().await?.unwrap_or_default();
            let info = StoreInfo {
                location: ctx.store.location().to_string(),
                size_bytes: ctx.store.storage_size().await?,
                version: document.metadata.version.clone(),
                last_modified: document.metadata.last_modified,
                counts: Counts::from(&document),
            };
            ctx.emit(&info, |ctx, i| {
                ctx.line(format!("Store      {}", i.location));
                ctx.line(format!("Size       {} bytes", i.size_bytes));
                ctx.line(format!("Version    {}", i.version));
                match i.last_modified {
                    Some(at) => ctx.line(format!("Modified   {}", at.format("%Y-%m-%d %H:%M:%S UTC"))),
                    None => ctx.line("Modified   never"),
                }
                for (name, count) in i.counts.rows() {
                    ctx.line(format!("  {:<15} {:>6}", name, count));
                }
            })
        }
    }
}
