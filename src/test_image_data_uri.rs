use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use log::info;
use ocr_fixtures_lib::{generate_data_uri, FixtureConfig};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render the test image and print it as a data URI", long_about = None)]
struct Args {
    /// JSON file with fixture settings
    #[arg(long, env = "FIXTURE_CONFIG")]
    config: Option<PathBuf>,

    /// Also write the rendered PNG to this path
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Parse command line arguments
    let args = Args::parse();
    let config = FixtureConfig::load_or_default(args.config.as_deref())?;

    // Render straight into memory, no file hand-off
    let (uri, font) = generate_data_uri(&config).context("Failed to render test image")?;
    info!("Rendered {} PNG bytes using {}", uri.payload.len(), font);

    // Keep a copy on disk if asked to
    if let Some(path) = &args.save {
        fs::write(path, &uri.payload)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Saved test image to {}", path.display());
    }

    println!("{}", uri);
    Ok(())
}
