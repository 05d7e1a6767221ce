pub mod config_lib;
pub mod data_uri_lib;
pub mod error;
pub mod font_lib;
pub mod image_generator_lib;

pub use config_lib::FixtureConfig;
pub use data_uri_lib::{
    encode_and_print, encode_and_write, encode_data_uri, encode_file, read_source, DataUri,
    EncoderConfig,
};
pub use error::{FixtureError, Result};
pub use font_lib::FontChoice;
pub use image_generator_lib::{
    generate_and_save, generate_png_bytes, render_canvas, GeneratorConfig, RenderedImage,
};

/// Render the test image and wrap it as a PNG data URI straight from memory,
/// skipping the round trip through the filesystem.
pub fn generate_data_uri<T: GeneratorConfig>(config: &T) -> Result<(DataUri, FontChoice)> {
    let (bytes, font) = generate_png_bytes(config)?;
    Ok((DataUri::new(data_uri_lib::DEFAULT_MIME_TYPE, bytes), font))
}
