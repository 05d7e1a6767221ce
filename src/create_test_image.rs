use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use log::info;
use ocr_fixtures_lib::{generate_and_save, FixtureConfig};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render the mock blood-test report to a PNG", long_about = None)]
struct Args {
    /// JSON file with fixture settings
    #[arg(long, env = "FIXTURE_CONFIG")]
    config: Option<PathBuf>,

    /// Path to write the PNG to
    #[arg(long)]
    output: Option<String>,

    /// Scalable font to render with (file name or path)
    #[arg(long)]
    font: Option<String>,

    /// Font size in pixels per em
    #[arg(long)]
    font_size: Option<f32>,

    /// Read the report text from this file instead of the built-in report
    #[arg(long)]
    text_file: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Result<FixtureConfig> {
        let mut config = FixtureConfig::load_or_default(self.config.as_deref())?;

        // Flags given on the command line win over the file
        if let Some(output) = self.output {
            config.dest_path = output;
        }
        if let Some(font) = self.font {
            config.font_path = font;
        }
        if let Some(font_size) = self.font_size {
            config.font_size = font_size;
        }
        if let Some(text_file) = self.text_file {
            config.text_content = fs::read_to_string(&text_file)
                .with_context(|| format!("Failed to read text file {}", text_file.display()))?;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Parse command line arguments on top of the config file, if any
    let config = Args::parse().into_config()?;

    // Render and write the image, overwriting any previous one
    let font = generate_and_save(&config)
        .with_context(|| format!("Failed to create test image at {}", config.dest_path))?;

    info!("Created test image at {} using {}", config.dest_path, font);
    Ok(())
}
