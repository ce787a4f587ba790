use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_FILE: &str = "patterns_output.txt";
pub const DEFAULT_MANIFEST_FILE: &str = "patterns.json";

/// One image to convert, in the order it should appear in the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub path: String,
    pub id: String,
    pub name: String,
}

impl ImageRecord {
    pub fn new(path: &str, id: &str, name: &str) -> Self {
        Self {
            path: path.to_string(),
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    /// Filesystem location of the image, with `~/` resolved
    pub fn resolved_path(&self) -> PathBuf {
        Manifest::expand_tilde(&self.path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version: String,
    pub output_file: String,
    pub images: Vec<ImageRecord>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            images: vec![
                ImageRecord::new("Figure/Top_Left.png", "pattern-17", "Top-Left Empty"),
                ImageRecord::new("Figure/Top-right.png", "pattern-18", "Top-Right Empty"),
                ImageRecord::new("Figure/Bottom Left.png", "pattern-19", "Bottom-Left Empty"),
                ImageRecord::new("Figure/Bottom Right.png", "pattern-20", "Bottom-Right Empty"),
                ImageRecord::new("Figure/Horizontal.png", "pattern-21", "Horizontal Empty"),
                ImageRecord::new("Figure/Vertical.png", "pattern-22", "Vertical Empty"),
            ],
        }
    }
}

impl Manifest {
    /// Load the manifest at `path`, or the built-in list when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(manifest_path) = path else {
            tracing::debug!("using built-in manifest");
            return Ok(Self::default());
        };

        if !manifest_path.exists() {
            anyhow::bail!(
                "Manifest file not found at specified path: {}",
                manifest_path.display()
            );
        }

        let contents = std::fs::read_to_string(manifest_path).with_context(|| {
            format!("Failed to read manifest file: {}", manifest_path.display())
        })?;

        let manifest: Self = serde_json::from_str(&contents).with_context(|| {
            format!("Failed to parse manifest file: {}", manifest_path.display())
        })?;

        manifest
            .validate()
            .with_context(|| format!("Invalid manifest file: {}", manifest_path.display()))?;

        for warning in manifest.warnings() {
            tracing::warn!(path = %manifest_path.display(), "{warning}");
        }

        tracing::debug!(
            path = %manifest_path.display(),
            images = manifest.images.len(),
            "manifest loaded"
        );

        Ok(manifest)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create manifest directory: {}", parent.display())
                })?;
            }
        }

        let contents =
            serde_json::to_string_pretty(self).context("Failed to serialize manifest")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write manifest file: {}", path.display()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.version.is_empty() {
            anyhow::bail!("Manifest version cannot be empty");
        }
        if self.output_file.is_empty() {
            anyhow::bail!("outputFile cannot be empty");
        }

        Ok(())
    }

    /// Record-level oddities. None of them stop a run: every record still
    /// gets its line, written as-is.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for (index, image) in self.images.iter().enumerate() {
            for (field, value) in [("path", &image.path), ("id", &image.id), ("name", &image.name)] {
                if value.is_empty() {
                    warnings.push(format!("images[{index}].{field} is empty"));
                }
            }

            for (field, value) in [("id", &image.id), ("name", &image.name)] {
                if value.contains(['\'', '\n', '\r']) {
                    warnings.push(format!(
                        "images[{index}].{field} contains a quote or line break: {value:?}"
                    ));
                }
            }

            if !seen.insert(image.id.as_str()) {
                warnings.push(format!("Duplicate image id: {}", image.id));
            }
        }

        warnings
    }

    pub fn expand_tilde(path: &str) -> PathBuf {
        if let Some(stripped) = path.strip_prefix("~/") {
            match dirs::home_dir() {
                Some(home) => home.join(stripped),
                None => PathBuf::from(path),
            }
        } else {
            PathBuf::from(path)
        }
    }
}
