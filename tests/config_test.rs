use anyhow::Result;
use ocr_fixtures_lib::config_lib::{DEFAULT_REPORT, WHITE};
use ocr_fixtures_lib::{EncoderConfig, FixtureConfig, GeneratorConfig};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn test_defaults_match_the_fixed_fixture() {
    let config = FixtureConfig::default();

    assert_eq!(config.output_path(), "test-image.png");
    assert_eq!(config.source_path(), "test-image.png");
    assert_eq!(config.canvas_size(), (400, 400));
    assert_eq!(config.background(), WHITE);
    assert_eq!(config.fill(), [0, 0, 0]);
    assert_eq!(config.origin(), (10, 10));
    assert_eq!(config.font_path(), "Arial.ttf");
    assert_eq!(config.font_size(), 12.0);
    assert_eq!(config.mime_type(), "image/png");
    assert_eq!(config.max_bytes(), None);
    assert!(config.text().starts_with("Blood Test Results\n"));
    assert_eq!(config.text().lines().count(), 11);
}

#[test]
fn test_partial_file_keeps_remaining_defaults() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("fixture.json");
    fs::write(
        &path,
        r#"{ "dest_path": "out/report.png", "canvas_size": [640, 480], "max_bytes": 20971520 }"#,
    )?;

    let config = FixtureConfig::load(&path)?;

    assert_eq!(config.dest_path, "out/report.png");
    assert_eq!(config.canvas_size(), (640, 480));
    assert_eq!(config.max_bytes, Some(20 * 1024 * 1024));
    assert_eq!(config.text_content, DEFAULT_REPORT);
    assert_eq!(config.source_path, "test-image.png");
    Ok(())
}

#[test]
fn test_unknown_fields_are_rejected() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("fixture.json");
    fs::write(&path, r#"{ "dest_pth": "typo.png" }"#)?;

    let err = FixtureConfig::load(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("dest_pth"));
    Ok(())
}

#[test]
fn test_missing_config_file_names_the_path() {
    let err = FixtureConfig::load_or_default(Some(Path::new("/no/such/fixture.json"))).unwrap_err();
    assert!(err.to_string().contains("/no/such/fixture.json"));
}
