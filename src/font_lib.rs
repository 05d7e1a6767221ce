use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use font8x8::legacy::BASIC_LEGACY;
use image::{Rgb, RgbImage};
use log::{debug, info, warn};
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Extra vertical space between lines, on top of the font's own line height.
pub const LINE_SPACING: f32 = 4.0;

const BITMAP_CELL: u32 = 8;

// Walked, in order, after the working directory when a bare file name is given
const FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

/// Which font a render actually used.
#[derive(Debug, Clone, PartialEq)]
pub enum FontChoice {
    Scalable { path: PathBuf },
    Fallback { reason: String },
}

impl FontChoice {
    pub fn is_fallback(&self) -> bool {
        matches!(self, FontChoice::Fallback { .. })
    }
}

impl fmt::Display for FontChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontChoice::Scalable { path } => write!(f, "{}", path.display()),
            FontChoice::Fallback { reason } => write!(f, "built-in bitmap font ({})", reason),
        }
    }
}

pub enum TextFont {
    Scalable { font: FontVec, scale: PxScale },
    Bitmap,
}

impl TextFont {
    /// Distance between the tops of two consecutive lines, in pixels.
    pub fn line_height(&self) -> f32 {
        match self {
            TextFont::Scalable { font, scale } => {
                let scaled = font.as_scaled(*scale);
                (scaled.height() + scaled.line_gap()).ceil() + LINE_SPACING
            }
            TextFont::Bitmap => BITMAP_CELL as f32 + LINE_SPACING,
        }
    }
}

/// Find the file behind a font name.
///
/// A name with a directory component is taken as-is. A bare file name is
/// looked up in the working directory first, then anywhere below the usual
/// system font directories.
pub fn resolve_font_path(name: &str) -> Option<PathBuf> {
    let requested = Path::new(name);
    let has_dir = requested
        .parent()
        .map_or(false, |parent| !parent.as_os_str().is_empty());

    if requested.is_file() {
        return Some(requested.to_path_buf());
    }
    if has_dir {
        return None;
    }

    let roots = FONT_DIRS.iter().map(PathBuf::from).collect::<Vec<PathBuf>>();
    find_font_in(&roots, name)
}

/// Search each root recursively for a file called `name`.
///
/// Roots are tried in order. Within a directory, files are checked before
/// subdirectories and entries are visited in name order, so the result is
/// stable across runs.
pub fn find_font_in(roots: &[PathBuf], name: &str) -> Option<PathBuf> {
    roots.iter().find_map(|root| find_in_tree(root, OsStr::new(name)))
}

fn find_in_tree(dir: &Path, name: &OsStr) -> Option<PathBuf> {
    debug!("Looking for font {:?} under {}", name, dir.display());

    let mut entries = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .collect::<Vec<fs::DirEntry>>();
    entries.sort_by_key(|entry| entry.file_name());

    // Matches in this directory win over anything deeper
    if let Some(found) = entries
        .iter()
        .map(|entry| entry.path())
        .find(|path| path.file_name() == Some(name) && path.is_file())
    {
        return Some(found);
    }

    // file_type() does not follow symlinks, which keeps link cycles out of the walk
    entries
        .iter()
        .filter(|entry| entry.file_type().map_or(false, |kind| kind.is_dir()))
        .find_map(|entry| find_in_tree(&entry.path(), name))
}

/// Load the named scalable font at `size` pixels per em, or fall back to
/// the built-in bitmap font.
///
/// Only "font unavailable" conditions trigger the fallback: the file cannot
/// be found or read, it does not parse as a font, or the size is unusable.
/// Nothing here returns an error.
pub fn load_font(name: &str, size: f32) -> (TextFont, FontChoice) {
    match load_scalable(name, size) {
        Ok((font, path)) => {
            info!("Using font {} at {}px", path.display(), size);
            (font, FontChoice::Scalable { path })
        }
        Err(reason) => {
            warn!("Font {} unavailable ({}), using built-in bitmap font", name, reason);
            (TextFont::Bitmap, FontChoice::Fallback { reason })
        }
    }
}

fn load_scalable(name: &str, size: f32) -> Result<(TextFont, PathBuf), String> {
    if !size.is_finite() || size <= 0.0 {
        return Err(format!("unusable font size {}", size));
    }

    let path = resolve_font_path(name).ok_or_else(|| format!("{} not found", name))?;
    let data = fs::read(&path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    let font = FontVec::try_from_vec(data)
        .map_err(|e| format!("{} is not a usable font: {}", path.display(), e))?;

    let scale = em_scale(&font, size);
    Ok((TextFont::Scalable { font, scale }, path))
}

// ab_glyph scales by ascent-to-descent height; callers think in em size.
fn em_scale(font: &FontVec, size: f32) -> PxScale {
    let units_per_em = font.units_per_em().unwrap_or(1000.0);
    PxScale::from(size * font.height_unscaled() / units_per_em)
}

/// Draw multi-line `text` with its top-left corner at `origin`.
///
/// Pixels that land outside the canvas are dropped; lines are never wrapped.
pub fn draw_text(canvas: &mut RgbImage, font: &TextFont, origin: (u32, u32), text: &str, color: Rgb<u8>) {
    let line_height = font.line_height();

    for (index, line) in text.lines().enumerate() {
        let top = origin.1 as f32 + index as f32 * line_height;
        match font {
            TextFont::Scalable { font, scale } => {
                draw_scalable_line(canvas, font, *scale, origin.0 as f32, top, line, color)
            }
            TextFont::Bitmap => draw_bitmap_line(canvas, origin.0, top as u32, line, color),
        }
    }
}

fn draw_scalable_line(
    canvas: &mut RgbImage,
    font: &FontVec,
    scale: PxScale,
    left: f32,
    top: f32,
    line: &str,
    color: Rgb<u8>,
) {
    let scaled = font.as_scaled(scale);
    let baseline = top + scaled.ascent();
    let mut caret = left;
    let mut previous: Option<GlyphId> = None;

    for ch in line.chars() {
        let id = font.glyph_id(ch);
        if let Some(previous) = previous {
            caret += scaled.kern(previous, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, baseline));
        caret += scaled.h_advance(id);
        previous = Some(id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|x, y, coverage| {
                let px = bounds.min.x as i64 + x as i64;
                let py = bounds.min.y as i64 + y as i64;
                blend_pixel(canvas, px, py, color, coverage);
            });
        }
    }
}

fn draw_bitmap_line(canvas: &mut RgbImage, left: u32, top: u32, line: &str, color: Rgb<u8>) {
    for (column, ch) in line.chars().enumerate() {
        let cell_left = left as i64 + column as i64 * BITMAP_CELL as i64;
        for (row, bits) in bitmap_glyph(ch).iter().enumerate() {
            for bit in 0..BITMAP_CELL {
                // font8x8 stores the leftmost pixel in the lowest bit
                if *bits & (1u8 << bit) != 0 {
                    blend_pixel(canvas, cell_left + bit as i64, top as i64 + row as i64, color, 1.0);
                }
            }
        }
    }
}

fn bitmap_glyph(ch: char) -> [u8; 8] {
    let index = if ch.is_ascii() { ch as usize } else { '?' as usize };
    BASIC_LEGACY[index]
}

fn blend_pixel(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    if coverage == 0.0 {
        return;
    }

    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for (dst, src) in pixel.0.iter_mut().zip(color.0) {
        *dst = (src as f32 * coverage + *dst as f32 * (1.0 - coverage)).round() as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn dark_pixels(canvas: &RgbImage) -> usize {
        canvas.pixels().filter(|p| p.0 != WHITE.0).count()
    }

    #[test]
    fn missing_explicit_path_does_not_resolve() {
        assert_eq!(resolve_font_path("/definitely/not/here/NoSuchFont.ttf"), None);
    }

    #[test]
    fn bare_name_is_found_in_nested_directories() -> anyhow::Result<()> {
        let first = tempfile::tempdir()?;
        let second = tempfile::tempdir()?;
        let nested = second.path().join("truetype").join("family");
        fs::create_dir_all(&nested)?;
        fs::write(nested.join("Nested.ttf"), b"font bytes")?;
        fs::write(second.path().join("Other.ttf"), b"font bytes")?;

        let roots = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(find_font_in(&roots, "Nested.ttf"), Some(nested.join("Nested.ttf")));
        assert_eq!(find_font_in(&roots, "Absent.ttf"), None);
        Ok(())
    }

    #[test]
    fn shallower_match_wins() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let deep = root.path().join("a");
        fs::create_dir_all(&deep)?;
        fs::write(deep.join("Same.ttf"), b"deep")?;
        fs::write(root.path().join("Same.ttf"), b"shallow")?;

        let roots = vec![root.path().to_path_buf()];
        assert_eq!(find_font_in(&roots, "Same.ttf"), Some(root.path().join("Same.ttf")));
        Ok(())
    }

    #[test]
    fn directory_named_like_the_font_is_not_a_match() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        fs::create_dir_all(root.path().join("Fake.ttf"))?;

        let roots = vec![root.path().to_path_buf()];
        assert_eq!(find_font_in(&roots, "Fake.ttf"), None);
        Ok(())
    }

    #[test]
    fn missing_font_falls_back_to_bitmap() {
        let (font, choice) = load_font("/definitely/not/here/NoSuchFont.ttf", 12.0);
        assert!(matches!(font, TextFont::Bitmap));
        assert!(choice.is_fallback());
    }

    #[test]
    fn bad_size_falls_back_even_before_lookup() {
        let (_, choice) = load_font("Arial.ttf", 0.0);
        match choice {
            FontChoice::Fallback { reason } => assert!(reason.contains("size")),
            other => panic!("expected fallback, got {:?}", other),
        }
    }

    #[test]
    fn non_font_file_falls_back() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let bogus = dir.path().join("Bogus.ttf");
        fs::write(&bogus, b"not a font at all")?;

        let (font, choice) = load_font(bogus.to_str().unwrap(), 12.0);
        assert!(matches!(font, TextFont::Bitmap));
        match choice {
            FontChoice::Fallback { reason } => assert!(reason.contains("not a usable font")),
            other => panic!("expected fallback, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn bitmap_text_marks_pixels_inside_its_lines() {
        let mut canvas = RgbImage::from_pixel(100, 40, WHITE);
        draw_text(&mut canvas, &TextFont::Bitmap, (2, 2), "AB\nC", BLACK);

        assert!(dark_pixels(&canvas) > 0);
        // Second line starts one bitmap line height further down
        let second_line_top = 2 + (BITMAP_CELL as f32 + LINE_SPACING) as u32;
        let second_line_ink = (second_line_top..second_line_top + BITMAP_CELL)
            .flat_map(|y| (0..100).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.get_pixel(x, y).0 == BLACK.0)
            .count();
        assert!(second_line_ink > 0);
    }

    #[test]
    fn space_draws_nothing() {
        let mut canvas = RgbImage::from_pixel(20, 20, WHITE);
        draw_text(&mut canvas, &TextFont::Bitmap, (0, 0), "   ", BLACK);
        assert_eq!(dark_pixels(&canvas), 0);
    }

    #[test]
    fn non_ascii_renders_as_question_mark() {
        assert_eq!(bitmap_glyph('é'), bitmap_glyph('?'));
    }

    #[test]
    fn text_past_the_edge_is_clipped() {
        let mut canvas = RgbImage::from_pixel(10, 10, WHITE);
        draw_text(&mut canvas, &TextFont::Bitmap, (6, 6), "WWWWWWWW\nWWWW", BLACK);
        draw_text(&mut canvas, &TextFont::Bitmap, (500, 500), "off canvas", BLACK);
        assert!(dark_pixels(&canvas) > 0);
        assert_eq!(canvas.dimensions(), (10, 10));
    }
}
