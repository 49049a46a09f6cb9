//! # Customer Commands

use clap::Subcommand;
use shopease_core::Customer;

use crate::commands::Context;
use crate::error::{CliError, CliResult};

#[derive(Debug, Subcommand)]
pub enum CustomerCommand {
    /// Add a customer record
    Add {
        name: String,
        #[arg(long)]
        phone: Option<String>,
    },
    List,
    /// Remove a customer (their past sales keep the recorded name)
    Delete { id: u64 },
}

pub async fn handle(ctx: &Context, cmd: CustomerCommand) -> CliResult<()> {
    let customers = ctx.store.customers();

    match cmd {
        CustomerCommand::Add { name, phone } => {
            let phone = phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty());
            let added = customers.add(Customer::new(name.trim(), phone)).await?;
            ctx.emit(&added, |ctx, c| {
                ctx.line(format!("✓ Added customer #{} {}", c.id, c.name))
            })
        }
        CustomerCommand::List => {
            let list = customers.list().await?;
            ctx.emit(&list, |ctx, list| {
                if list.is_empty() {
                    ctx.line("No customers.");
                }
                for c in list {
                    ctx.line(format!(
                        "{:>4}  {:<30} {}",
                        c.id,
                        c.name,
                        c.phone.as_deref().unwrap_or("-")
                    ));
                }
            })
        }
        CustomerCommand::Delete { id } => {
            if !customers.delete(id).await? {
                return Err(CliError::not_found("Customer", id));
            }
            ctx.emit(&id, |ctx, id| ctx.line(format!("✓ Deleted customer #{}", id)))
        }
    }
}
