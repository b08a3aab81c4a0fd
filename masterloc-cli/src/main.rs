use clap::Parser;

mod commands;
mod providers;

use commands::Commands;

#[derive(Parser)]
#[command(name = "masterloc")]
#[command(about = "Incremental localization synchronization for game master data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}
