//! AGEPRO Tools
//!
//! CLI tools for checking and rewriting AGEPRO input files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

use agepro_input::{CodecConfig, Profile, ScenarioDocument};

/// Initialize logging with a default filter.
///
/// Use `RUST_LOG` environment variable to override the default filter.
/// Default is `info`, with codec internals at `warn`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,agepro_input=warn,agepro_tools=debug"));

    fmt().with_env_filter(filter).with_target(false).init();
}

/// Codec settings from an optional YAML file, with `strict` forcing the strict profile.
pub fn load_config(path: Option<&Path>, strict: bool) -> Result<CodecConfig> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            let config: CodecConfig = serde_yaml::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?;
            debug!(path = %path.display(), profile = ?config.profile, "config loaded");
            config
        }
        None => CodecConfig::default(),
    };
    if strict {
        config.profile = Profile::Strict;
    }
    Ok(config)
}

/// Read and decode an input file.
pub fn read_document(path: &Path, config: &CodecConfig) -> Result<ScenarioDocument> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    ScenarioDocument::from_text(&text, config)
        .with_context(|| format!("failed to decode {}", path.display()))
}

/// Write a document in canonical form.
pub fn write_document(path: &Path, document: &ScenarioDocument) -> Result<()> {
    let text = document
        .to_text()
        .with_context(|| format!("failed to encode {}", path.display()))?;
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}
