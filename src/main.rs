//! Yuzu - A static blog generator for AsciiDoc content.

mod articles;
mod build;
mod cli;
mod config;
mod content;
mod error;
mod logger;
mod page;
mod pipeline;
mod tags;
mod utils;

use anyhow::{Context, Result, bail};
use build::generate_site;
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use pipeline::Pipeline;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Build { .. } => {
            let pipeline = Pipeline::from_config(&config);
            let report = generate_site(&config, &pipeline).context("Site build failed")?;
            log!("build"; "published {} files", report.files.len());
            Ok(())
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    if !config_path.exists() {
        bail!("Config file not found: {}", config_path.display());
    }

    let mut config = SiteConfig::from_path(&config_path)?;
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}
