//! # Commands Module
//!
//! One module per top-level command.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (Context, dispatch)
//! ├── product.rs     ◄─── Catalog CRUD and search
//! ├── stock.rs       ◄─── Ledger movements, history, low stock
//! ├── sale.rs        ◄─── Checkout and sales history
//! ├── customer.rs    ◄─── Customer records
//! ├── employee.rs    ◄─── Hire / dismiss
//! ├── attendance.rs  ◄─── Daily attendance
//! ├── report.rs      ◄─── Dashboard, finance, categories, trends
//! ├── data.rs        ◄─── Snapshot export / import, clear, info
//! └── login.rs       ◄─── Credential check
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  $ shopease --json stock low                                            │
//! │         │                                                               │
//! │         ▼  clap                                                         │
//! │  Command::Stock(StockCommand::Low { threshold: None })                  │
//! │         │                                                               │
//! │         ▼  dispatch(ctx, command)                                       │
//! │  stock::handle(&ctx, cmd)                                               │
//! │      ctx.store.ledger().low_stock(ctx.config.shop.low_stock_threshold)  │
//! │         │                                                               │
//! │         ▼  ctx.emit(&products, |ctx, p| text table)                     │
//! │  stdout: JSON (with --json) or a table                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod attendance;
pub mod customer;
pub mod data;
pub mod employee;
pub mod login;
pub mod product;
pub mod report;
pub mod sale;
pub mod stock;

use serde::Serialize;
use shopease_core::Money;
use shopease_store::DocumentStore;
use std::sync::Mutex;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::error::CliResult;

/// Everything a command handler needs.
pub struct Context {
    pub store: DocumentStore,
    pub config: AppConfig,
    pub json: bool,
    /// Collected output lines instead of stdout (tests).
    captured: Option<Mutex<Vec<String>>>,
}

impl Context {
    pub fn new(store: DocumentStore, config: AppConfig, json: bool) -> Self {
        Context {
            store,
            config,
            json,
            captured: None,
        }
    }

    /// A context that collects output instead of printing it.
    pub fn capturing(store: DocumentStore, config: AppConfig, json: bool) -> Self {
        Context {
            captured: Some(Mutex::new(Vec::new())),
            ..Context::new(store, config, json)
        }
    }

    /// Writes one line of output.
    pub fn line(&self, text: impl Into<String>) {
        let text = text.into();
        match &self.captured {
            Some(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(text);
                }
            }
            None => println!("{}", text),
        }
    }

    /// Emits `value` as JSON with `--json`, otherwise runs `text`.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&Self, &T)) -> CliResult<()> {
        if self.json {
            self.line(serde_json::to_string_pretty(value)?);
        } else {
            text(self, value);
        }
        Ok(())
    }

    /// Amount in the shop's currency format.
    pub fn money(&self, amount: Money) -> String {
        self.config.format_currency(amount)
    }

    /// Output collected by a capturing context.
    pub fn output(&self) -> Vec<String> {
        self.captured
            .as_ref()
            .and_then(|lines| lines.lock().ok().map(|lines| lines.clone()))
            .unwrap_or_default()
    }
}

/// Routes a parsed command to its handler.
pub async fn dispatch(ctx: &Context, command: Command, created: bool) -> CliResult<()> {
    match command {
        Command::Init => {
            if created {
                ctx.line(format!("✓ Created store at {}", ctx.store.location()));
                ctx.line("  Default logins: admin / admin123, cashier / cashier123");
            } else {
                ctx.line(format!("Store already exists at {}", ctx.store.location()));
            }
            Ok(())
        }
        Command::Product(cmd) => product::handle(ctx, cmd).await,
        Command::Stock(cmd) => stock::handle(ctx, cmd).await,
        Command::Sale(cmd) => sale::handle(ctx, cmd).await,
        Command::Customer(cmd) => customer::handle(ctx, cmd).await,
        Command::Employee(cmd) => employee::handle(ctx, cmd).await,
        Command::Attendance(cmd) => attendance::handle(ctx, cmd).await,
        Command::Report(cmd) => report::handle(ctx, cmd).await,
        Command::Data(cmd) => data::handle(ctx, cmd).await,
        Command::Login(args) => login::handle(ctx, args).await,
    }
}
