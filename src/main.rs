use clap::Parser;
use millprobe::cli::Cli;
use millprobe::{init_logging, BUILD_DATE, VERSION};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    // Initialize logging
    init_logging(&config.logging)?;
    tracing::debug!("MillProbe {} (built {})", VERSION, BUILD_DATE);

    let output = cli.run(&config)?;
    println!("{}", output);

    Ok(())
}
