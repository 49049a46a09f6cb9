//! # Command Line Definition
//!
//! ```text
//! shopease [--config FILE] [--data FILE] [--json] <COMMAND>
//!
//!   init                         create the store (default users included)
//!   product    add | list | show | update | delete
//!   stock      in | out | history | low
//!   sale       checkout | list
//!   customer   add | list | delete
//!   employee   hire | list | dismiss
//!   attendance mark | toggle | summary
//!   report     dashboard | finance | categories | trend
//!   data       export | import | clear | info
//!   login      <USERNAME> --password <PASSWORD>
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::attendance::AttendanceCommand;
use crate::commands::customer::CustomerCommand;
use crate::commands::data::DataCommand;
use crate::commands::employee::EmployeeCommand;
use crate::commands::login::LoginArgs;
use crate::commands::product::ProductCommand;
use crate::commands::report::ReportCommand;
use crate::commands::sale::SaleCommand;
use crate::commands::stock::StockCommand;

#[derive(Debug, Parser)]
#[command(name = "shopease", about = "ShopEase point of sale and inventory", version)]
pub struct Cli {
    /// Config file (default: platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store file, overriding config and environment
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Render command output as pretty JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the store if it does not exist yet
    Init,
    #[command(subcommand)]
    Product(ProductCommand),
    #[command(subcommand)]
    Stock(StockCommand),
    #[command(subcommand)]
    Sale(SaleCommand),
    #[command(subcommand)]
    Customer(CustomerCommand),
    #[command(subcommand)]
    Employee(EmployeeCommand),
    #[command(subcommand)]
    Attendance(AttendanceCommand),
    #[command(subcommand)]
    Report(ReportCommand),
    #[command(subcommand)]
    Data(DataCommand),
    /// Check credentials and print a session
    Login(LoginArgs),
}

impl Command {
    /// Whether the store must hold a readable document before this runs.
    ///
    /// Clearing and importing replace the document wholesale, so they also
    /// work on a corrupted file.
    pub fn needs_initialized_store(&self) -> bool {
        !matches!(
            self,
            Command::Data(DataCommand::Clear { .. }) | Command::Data(DataCommand::Import { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::sale::ItemSpec;
    use shopease_core::reports::Period;
    use shopease_core::Money;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_checkout() {
        let cli = Cli::try_parse_from([
            "shopease", "sale", "checkout", "--item", "A1:3", "--item", "B2:1", "--walk-in",
        ])
        .unwrap();

        match cli.command {
            Command::Sale(SaleCommand::Checkout(args)) => {
                assert_eq!(
                    args.items,
                    vec![
                        ItemSpec { sku: "A1".to_string(), quantity: 3 },
                        ItemSpec { sku: "B2".to_string(), quantity: 1 },
                    ]
                );
                assert!(args.walk_in);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_customer_flags_conflict() {
        let result = Cli::try_parse_from([
            "shopease", "sale", "checkout", "--item", "A1:1", "--walk-in", "--name", "Bilal",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_money_and_period_arguments() {
        let cli = Cli::try_parse_from([
            "shopease", "product", "add", "--name", "Tee", "--sku", "A1", "--category", "Tops",
            "--cost", "5", "--price", "8.50", "--quantity", "10",
        ])
        .unwrap();
        match cli.command {
            Command::Product(ProductCommand::Add(args)) => {
                assert_eq!(args.cost, Money::from_minor(500));
                assert_eq!(args.price, Money::from_minor(850));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["shopease", "report", "finance", "--period", "month"])
            .unwrap();
        match cli.command {
            Command::Report(ReportCommand::Finance { period }) => {
                assert_eq!(period, Period::Month)
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from([
            "shopease", "product", "add", "--name", "Tee", "--sku", "A1", "--category", "Tops",
            "--cost", "5.001", "--price", "8", "--quantity", "1",
        ])
        .is_err());
    }

    #[test]
    fn test_recovery_commands_skip_initialization() {
        let clear = Cli::try_parse_from(["shopease", "data", "clear", "--yes"]).unwrap();
        assert!(!clear.command.needs_initialized_store());

        let info = Cli::try_parse_from(["shopease", "data", "info"]).unwrap();
        assert!(info.command.needs_initialized_store());
    }
}
