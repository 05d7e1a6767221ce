use crate::error::{FixtureError, Result};
use crate::font_lib::{self, FontChoice};
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use log::info;
use std::fs;
use std::io::Cursor;
use std::path::Path;

// Trait to abstract where the rendering parameters come from
pub trait GeneratorConfig {
    fn output_path(&self) -> &str;
    fn text(&self) -> &str;
    fn canvas_size(&self) -> (u32, u32);
    fn background(&self) -> [u8; 3];
    fn fill(&self) -> [u8; 3];
    fn origin(&self) -> (u32, u32);
    fn font_path(&self) -> &str;
    fn font_size(&self) -> f32;
}

pub struct RenderedImage {
    pub image: RgbImage,
    pub font: FontChoice,
}

/// Render the configured text onto a fresh canvas.
///
/// Font loading never fails the render; the bitmap fallback is used instead
/// and recorded in `RenderedImage::font`.
pub fn render_canvas<T: GeneratorConfig>(config: &T) -> Result<RenderedImage> {
    let (width, height) = config.canvas_size();
    if width == 0 || height == 0 {
        return Err(FixtureError::InvalidCanvas { width, height });
    }

    // Start from a canvas filled with the background color
    let mut image = RgbImage::from_pixel(width, height, Rgb(config.background()));

    // Pick the font once; a missing one falls back to the bitmap font
    let (text_font, font) = font_lib::load_font(config.font_path(), config.font_size());

    font_lib::draw_text(&mut image, &text_font, config.origin(), config.text(), Rgb(config.fill()));

    Ok(RenderedImage { image, font })
}

/// Render and encode as PNG without touching the filesystem.
pub fn generate_png_bytes<T: GeneratorConfig>(config: &T) -> Result<(Vec<u8>, FontChoice)> {
    let rendered = render_canvas(config)?;

    // Encode as PNG into an in-memory buffer
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(rendered.image)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;

    Ok((bytes, rendered.font))
}

/// Render the test image and write it to `config.output_path()`, replacing
/// whatever was there.
pub fn generate_and_save<T: GeneratorConfig>(config: &T) -> Result<FontChoice> {
    let (bytes, font) = generate_png_bytes(config)?;
    let path = Path::new(config.output_path());

    // fs::write truncates, so an existing file is replaced rather than appended to
    fs::write(path, &bytes).map_err(|source| FixtureError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(font)
}
