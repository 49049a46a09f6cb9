//! # ShopEase
//!
//! `shopease --help` lists the commands; see the library docs for startup.

use std::process::ExitCode;

use clap::Parser;
use shopease_cli::cli::Cli;
use shopease_cli::{init_tracing, run};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let json = cli.json;
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json {
                match serde_json::to_string_pretty(&err) {
                    Ok(body) => eprintln!("{}", body),
                    Err(_) => eprintln!("{}", err),
                }
            } else {
                eprintln!("{}", err);
            }
            ExitCode::FAILURE
        }
    }
}
