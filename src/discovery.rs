//! Discovery Module
//!
//! Recursively scans an input directory for header metadata (`*.json`) and the
//! generator config that sits next to each one (`<stem>.toml`).

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::{load_header_config, HeaderConfig};
use crate::finalize::GENERATED_SUFFIX;
use crate::validate::{GeneratorError, HeaderIR, ERR_IO, ERR_IR_PARSE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSource {
    pub stem: String,
    pub ir_path: PathBuf,
    pub config_path: Option<PathBuf>,
}

impl HeaderSource {
    /// Headers without a config still get their enums normalized.
    pub fn load_config(&self) -> Result<HeaderConfig, GeneratorError> {
        match &self.config_path {
            Some(path) => load_header_config(path),
            None => Ok(HeaderConfig::default()),
        }
    }
}

/// Discover all header metadata files under `dir`, sorted by path.
pub fn discover_headers(dir: &Path) -> Result<Vec<HeaderSource>, GeneratorError> {
    if !dir.is_dir() {
        return Err(GeneratorError::new(
            ERR_IO,
            format!("Input directory {} does not exist", dir.display()),
        ));
    }

    let mut headers = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            GeneratorError::new(ERR_IO, format!("Failed to walk {}: {}", dir.display(), e))
        })?;
        let path = entry.path();
        if !path.is_file() || !is_header_ir(path) {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let config_path = path.with_extension("toml");
        let config_path = config_path.is_file().then_some(config_path);

        debug!(path = %path.display(), has_config = config_path.is_some(), "found header");
        headers.push(HeaderSource {
            stem: stem.to_string(),
            ir_path: path.to_path_buf(),
            config_path,
        });
    }

    Ok(headers)
}

fn is_header_ir(path: &Path) -> bool {
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let generated = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(GENERATED_SUFFIX));
    is_json && !generated
}

pub fn parse_header_ir(source: &str, origin: &str) -> Result<HeaderIR, GeneratorError> {
    serde_json::from_str(source).map_err(|e| {
        GeneratorError::new(
            ERR_IR_PARSE,
            format!("Invalid header metadata {}: {}", origin, e),
        )
    })
}

/// Load one header; an unnamed header takes its file stem as name.
pub fn load_header_ir(source: &HeaderSource) -> Result<HeaderIR, GeneratorError> {
    let path = &source.ir_path;
    let data = fs::read_to_string(path).map_err(|e| {
        GeneratorError::new(
            ERR_IO,
            format!("Failed to read {}: {}", path.display(), e),
        )
    })?;

    let mut header = parse_header_ir(&data, &path.display().to_string())?;
    if header.name.is_empty() {
        header.name = source.stem.clone();
    }
    Ok(header)
}
