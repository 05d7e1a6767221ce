use crate::error::{FixtureError, Result};
use base64::{engine::general_purpose, Engine as _};
use log::info;
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

pub const DEFAULT_MIME_TYPE: &str = "image/png";

// Trait to abstract where the encoder gets its input settings
pub trait EncoderConfig {
    fn source_path(&self) -> &str;

    fn mime_type(&self) -> &str {
        DEFAULT_MIME_TYPE
    }

    /// Refuse sources larger than this many bytes.
    fn max_bytes(&self) -> Option<u64> {
        None
    }
}

/// Bytes plus the MIME type they are labelled with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub payload: Vec<u8>,
}

impl DataUri {
    pub fn new(mime_type: &str, payload: Vec<u8>) -> Self {
        DataUri { mime_type: mime_type.to_string(), payload }
    }

    /// Parse a `data:<mime>;base64,<payload>` string back into bytes.
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .trim_end()
            .strip_prefix("data:")
            .ok_or_else(|| FixtureError::InvalidDataUri("missing data: scheme".into()))?;

        let (header, encoded) = rest
            .split_once(',')
            .ok_or_else(|| FixtureError::InvalidDataUri("missing comma before payload".into()))?;

        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| FixtureError::InvalidDataUri("payload is not marked ;base64".into()))?;

        let payload = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| FixtureError::InvalidDataUri(format!("bad base64 payload: {}", e)))?;

        Ok(DataUri::new(mime_type, payload))
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_data_uri(&self.payload, &self.mime_type))
    }
}

/// Standard padded base64 wrapped in a data URI.
pub fn encode_data_uri(bytes: &[u8], mime_type: &str) -> String {
    format!("data:{};base64,{}", mime_type, general_purpose::STANDARD.encode(bytes))
}

/// Read a whole file into memory.
///
/// The handle is dropped on every return path.
pub fn read_source(path: &Path, max_bytes: Option<u64>) -> Result<Vec<u8>> {
    let read_error = |source: io::Error| FixtureError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => FixtureError::FileNotFound { path: path.to_path_buf() },
        _ => read_error(source),
    })?;

    // Check the size before pulling the whole file into memory
    if let Some(limit) = max_bytes {
        let size = file.metadata().map_err(read_error)?.len();
        if size > limit {
            return Err(FixtureError::TooLarge { path: path.to_path_buf(), size, limit });
        }
    }

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_error)?;
    Ok(bytes)
}

pub fn encode_file<T: EncoderConfig>(config: &T) -> Result<DataUri> {
    let path = Path::new(config.source_path());
    let bytes = read_source(path, config.max_bytes())?;
    info!("Encoding {} bytes from {}", bytes.len(), path.display());
    Ok(DataUri::new(config.mime_type(), bytes))
}

/// Write the data URI for the configured source as a single line.
///
/// Nothing reaches `out` unless the whole file was read and encoded.
pub fn encode_and_write<T: EncoderConfig, W: Write>(config: &T, out: &mut W) -> Result<()> {
    // Encode fully before writing so a failed read leaves `out` untouched
    let uri = encode_file(config)?.to_string();
    writeln!(out, "{}", uri)
        .and_then(|_| out.flush())
        .map_err(FixtureError::Output)
}

pub fn encode_and_print<T: EncoderConfig>(config: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    encode_and_write(config, &mut handle)
}
