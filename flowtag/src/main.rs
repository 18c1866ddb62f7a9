mod aggregate;
mod args;
mod error;
mod flow_log;
mod output;
mod pipeline;
mod tables;
mod tests;

use anyhow::Context;
use args::{Cli, ConfigFile};
use clap::Parser;
use log::{error, info};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = try_main() {
        error!("An error occurred during execution: {:#}", e);
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // If a config file is provided, load it
    let config = match cli.config_file.as_deref() {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let paths = cli.resolve(config);

    let summary = pipeline::run(&paths)
        .with_context(|| format!("processing flow log {}", paths.flow_log.display()))?;

    info!(
        "Wrote {} tags and {} port/protocol pairs from {} classified lines ({} skipped)",
        summary.distinct_tags,
        summary.distinct_port_protocols,
        summary.stats.classified,
        summary.stats.malformed
    );
    info!("Duration: {:.4} seconds", summary.elapsed.as_secs_f64());

    Ok(())
}
