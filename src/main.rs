//! Shower Monitor - logs shower water temperature from an XBee serial sensor
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::PathBuf;

use clap::Parser;
use showermon_app::RunOptions;
use showermon_core::Result;

/// Shower Monitor - temperature logger and warming/cooling detector
#[derive(Parser, Debug)]
#[command(name = "showermon")]
#[command(about = "Log shower temperature readings from an XBee serial sensor", long_about = None)]
struct Args {
    /// Serial device path
    #[arg(long, value_name = "DEVICE")]
    port: Option<String>,

    /// Serial baud rate
    #[arg(long, value_name = "RATE")]
    baud: Option<u32>,

    /// CSV data log path
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print status events as NDJSON instead of text
    #[arg(long)]
    json: bool,

    /// Read sensor lines from stdin instead of the serial port
    #[arg(long, conflicts_with_all = ["port", "baud"])]
    stdin: bool,

    /// Settings file (defaults to ./showermon.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl From<Args> for RunOptions {
    fn from(args: Args) -> Self {
        RunOptions {
            config: args.config,
            port: args.port,
            baud_rate: args.baud,
            log_file: args.log_file,
            json: args.json,
            stdin: args.stdin,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    showermon_app::run(args.into()).await
}
