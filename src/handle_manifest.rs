use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::manifest::{Manifest, DEFAULT_MANIFEST_FILE};
use crate::ManifestCommands;

pub fn handle_manifest_command(
    command: ManifestCommands,
    manifest_path: Option<&Path>,
) -> Result<()> {
    match command {
        ManifestCommands::Init { force, path } => {
            let path = path
                .or_else(|| manifest_path.map(Path::to_path_buf))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST_FILE));

            if path.exists() && !force {
                println!("⚠️  Manifest file already exists at: {}", path.display());
                println!("   Use --force to overwrite");
                return Ok(());
            }

            let default_manifest = Manifest::default();
            default_manifest.save(&path)?;
            println!("✅ Created manifest file at: {}", path.display());
        }
        ManifestCommands::Show { json } => {
            let manifest = Manifest::load(manifest_path)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&manifest)?);
            } else {
                println!("Pattern Manifest");
                println!("================");
                println!();
                match manifest_path {
                    Some(p) => println!("Source: {}", p.display()),
                    None => println!("Source: built-in"),
                }
                println!("Version: {}", manifest.version);
                println!("Output File: {}", manifest.output_file);
                println!();
                println!("Images ({}):", manifest.images.len());
                for image in &manifest.images {
                    println!("  {}  {}  ({})", image.id, image.name, image.path);
                }
            }
        }
        ManifestCommands::Validate => {
            match manifest_path {
                Some(p) => println!("🔍 Validating manifest file at: {}", p.display()),
                None => println!("🔍 Validating built-in manifest"),
            }

            match Manifest::load(manifest_path) {
                Ok(manifest) => {
                    println!("✅ Manifest file is valid!");
                    let warnings = manifest.warnings();
                    if !warnings.is_empty() {
                        println!();
                        println!("⚠️  Warnings (records are still converted as written):");
                        for warning in &warnings {
                            println!("   {warning}");
                        }
                    }
                    println!();
                    println!("Resolved image paths:");
                    for image in &manifest.images {
                        let resolved = image.resolved_path();
                        let status = if resolved.exists() { "" } else { " (missing)" };
                        println!("  {}: {}{}", image.id, resolved.display(), status);
                    }
                }
                Err(e) => {
                    println!("❌ Manifest file validation failed:");
                    println!("   {e:#}");
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
