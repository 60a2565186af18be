use anyhow::Result;
use clap::Parser;

use file_finder::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
