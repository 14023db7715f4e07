use anyhow::Context;
use clap::Parser;
use econ_forecast::{Cli, run_command};

fn main() -> anyhow::Result<()> {
    // A. Init Logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Run the request and print it for the presentation layer
    let output = run_command(&args)?;
    let rendered = serde_json::to_string_pretty(&output).context("rendering result as JSON")?;
    println!("{}", rendered);
    Ok(())
}
