use crate::data_uri_lib::{EncoderConfig, DEFAULT_MIME_TYPE};
use crate::image_generator_lib::GeneratorConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_IMAGE_PATH: &str = "test-image.png";
pub const DEFAULT_FONT: &str = "Arial.ttf";
pub const DEFAULT_FONT_SIZE: f32 = 12.0;
pub const DEFAULT_CANVAS_SIZE: [u32; 2] = [400, 400];
pub const DEFAULT_ORIGIN: [u32; 2] = [10, 10];
pub const WHITE: [u8; 3] = [255, 255, 255];
pub const BLACK: [u8; 3] = [0, 0, 0];

/// Mock blood-test report used as OCR input.
pub const DEFAULT_REPORT: &str = "Blood Test Results
=================

Test Date: 2025-06-21

Parameters:
- Hemoglobin: 14.5 g/dL
- Glucose: 95 mg/dL
- Cholesterol: 180 mg/dL
- HDL: 55 mg/dL
- LDL: 100 mg/dL";

/// Everything both tools can be told, as read from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureConfig {
    pub dest_path: String,
    pub source_path: String,
    pub text_content: String,
    pub canvas_size: [u32; 2],
    pub background: [u8; 3],
    pub fill: [u8; 3],
    pub origin: [u32; 2],
    pub font_path: String,
    pub font_size: f32,
    pub mime_type: String,
    pub max_bytes: Option<u64>,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        FixtureConfig {
            dest_path: DEFAULT_IMAGE_PATH.to_string(),
            source_path: DEFAULT_IMAGE_PATH.to_string(),
            text_content: DEFAULT_REPORT.to_string(),
            canvas_size: DEFAULT_CANVAS_SIZE,
            background: WHITE,
            fill: BLACK,
            origin: DEFAULT_ORIGIN,
            font_path: DEFAULT_FONT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            max_bytes: None,
        }
    }
}

impl FixtureConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Defaults, or the file's contents when a path is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

impl GeneratorConfig for FixtureConfig {
    fn output_path(&self) -> &str {
        &self.dest_path
    }

    fn text(&self) -> &str {
        &self.text_content
    }

    fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_size[0], self.canvas_size[1])
    }

    fn background(&self) -> [u8; 3] {
        self.background
    }

    fn fill(&self) -> [u8; 3] {
        self.fill
    }

    fn origin(&self) -> (u32, u32) {
        (self.origin[0], self.origin[1])
    }

    fn font_path(&self) -> &str {
        &self.font_path
    }

    fn font_size(&self) -> f32 {
        self.font_size
    }
}

impl EncoderConfig for FixtureConfig {
    fn source_path(&self) -> &str {
        &self.source_path
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn max_bytes(&self) -> Option<u64> {
        self.max_bytes
    }
}
