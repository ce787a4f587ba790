use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::manifest::ImageRecord;

const SEPARATOR_WIDTH: usize = 50;

/// Media types an image record can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeType {
    Png,
    Jpeg,
    Gif,
}

impl MimeType {
    /// Derive the MIME type from the file extension. Anything unrecognised,
    /// including a missing extension, is treated as PNG.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "jpg" | "jpeg" => MimeType::Jpeg,
            "gif" => MimeType::Gif,
            _ => MimeType::Png,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::Png => "image/png",
            MimeType::Jpeg => "image/jpeg",
            MimeType::Gif => "image/gif",
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `data:<mime>;base64,<payload>` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri(String);

impl DataUri {
    pub fn new(mime: MimeType, bytes: &[u8]) -> Self {
        DataUri(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("File not found - {}", path.display())]
    NotFound { path: PathBuf },
    #[error("Error processing {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EncodeError {
    fn from_io(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            EncodeError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            EncodeError::Read {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }

    /// Line shown to the operator for a degraded record
    pub fn diagnostic(&self) -> String {
        match self {
            EncodeError::NotFound { .. } => format!("Warning: {self}"),
            EncodeError::Read { .. } => self.to_string(),
        }
    }
}

/// Read the whole file at `path` and encode it as a data URI.
pub fn encode_image_to_data_uri(path: &Path) -> Result<DataUri, EncodeError> {
    let bytes = {
        let mut file = File::open(path).map_err(|e| EncodeError::from_io(path, e))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| EncodeError::from_io(path, e))?;
        bytes
    };

    let mime = MimeType::from_path(path);
    tracing::debug!(path = %path.display(), bytes = bytes.len(), %mime, "encoded image");

    Ok(DataUri::new(mime, &bytes))
}

#[derive(Debug)]
pub struct ConversionResult {
    pub id: String,
    pub name: String,
    pub data_uri: Result<DataUri, EncodeError>,
}

impl ConversionResult {
    /// Render as an array-literal entry. A failed encoding renders as `''`.
    pub fn format_line(&self) -> String {
        let base64 = match &self.data_uri {
            Ok(uri) => uri.as_str(),
            Err(_) => "",
        };
        format!(
            "    {{ id: '{}', name: '{}', type: 'pattern', base64: '{}' }},",
            self.id, self.name, base64
        )
    }
}

/// Encode every record in order. Per-file failures are reported and kept in
/// the result; they never stop the batch.
pub fn convert(records: &[ImageRecord]) -> Vec<ConversionResult> {
    let mut results = Vec::with_capacity(records.len());

    for record in records {
        let data_uri = encode_image_to_data_uri(&record.resolved_path());
        if let Err(e) = &data_uri {
            eprintln!("{}", e.diagnostic());
        }

        results.push(ConversionResult {
            id: record.id.clone(),
            name: record.name.clone(),
            data_uri,
        });
        println!("Processed: {}", record.name);
    }

    results
}

/// One newline-terminated line per result, in order.
pub fn render_output(results: &[ConversionResult]) -> String {
    results
        .iter()
        .map(|r| format!("{}\n", r.format_line()))
        .collect()
}

/// Convert all records, print the snippets and write them to `output_file`.
pub fn run(records: &[ImageRecord], output_file: &Path) -> Result<Vec<ConversionResult>> {
    let separator = "-".repeat(SEPARATOR_WIDTH);

    println!("Converting images to base64 pattern definitions...\n");
    println!("{separator}");

    let results = convert(records);

    println!("{separator}");
    println!("\nOutput:\n");
    for result in &results {
        println!("{}", result.format_line());
    }

    std::fs::write(output_file, render_output(&results))
        .with_context(|| format!("Failed to write output file: {}", output_file.display()))?;

    let failed = results.iter().filter(|r| r.data_uri.is_err()).count();
    tracing::debug!(records = results.len(), failed, "conversion finished");

    println!("\nResults saved to: {}", output_file.display());

    Ok(results)
}
