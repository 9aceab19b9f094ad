//! replykit - smart reply assistant command-line interface

use anyhow::Result;
use clap::Parser as _;
use cli::Cli;

mod cli;
mod handlers;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    handlers::run(cli.data_dir, cli.command).await
}
