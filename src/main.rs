mod cli;
mod config;
mod cover;
mod document;
mod error;
mod front_matter;
mod links;
mod markdown;
mod media;
mod parser;
mod patterns;
mod publisher;
mod wordpress;
mod xmlrpc;

use clap::Parser;
use log::LevelFilter;
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_logging(cli.log_level.into());

    log::info!("md2wp {} starting", env!("CARGO_PKG_VERSION"));
    log::debug!("Input: {}", cli.input.display());

    match publisher::publish(&cli) {
        Ok(()) => {
            log::info!("Publishing finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Publishing failed: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}:{} - {}",
                buf.timestamp(),
                record.level(),
                record.module_path().unwrap_or("md2wp"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
