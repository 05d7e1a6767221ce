use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use ocr_fixtures_lib::{encode_and_print, FixtureConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Print an image file as a base64 data URI", long_about = None)]
struct Args {
    /// JSON file with fixture settings
    #[arg(long, env = "FIXTURE_CONFIG")]
    config: Option<PathBuf>,

    /// Image file to encode
    #[arg(long)]
    input: Option<String>,

    /// MIME type to label the payload with
    #[arg(long)]
    mime_type: Option<String>,

    /// Refuse files larger than this many bytes
    #[arg(long)]
    max_bytes: Option<u64>,
}

impl Args {
    fn into_config(self) -> Result<FixtureConfig> {
        let mut config = FixtureConfig::load_or_default(self.config.as_deref())?;

        // Flags given on the command line win over the file
        if let Some(input) = self.input {
            config.source_path = input;
        }
        if let Some(mime_type) = self.mime_type {
            config.mime_type = mime_type;
        }
        if self.max_bytes.is_some() {
            config.max_bytes = self.max_bytes;
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

    // Only the data URI goes to stdout
    encode_and_print(&config)
        .with_context(|| format!("Failed to encode {}", config.source_path))?;

    Ok(())
}
