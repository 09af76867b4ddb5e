//! Finalize Module
//!
//! Runs both passes over one header and writes the document the template
//! layer consumes. `generate_bindings` drives a whole input directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::HeaderConfig;
use crate::discovery::{discover_headers, load_header_ir};
use crate::enums::{normalize_enum, NormalizedEnum};
use crate::transform::{transform_function, BoundFunction};
use crate::validate::{GeneratorError, HeaderIR, ERR_IO};

/// Suffix of generated documents; discovery skips these.
pub const GENERATED_SUFFIX: &str = ".gen.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedHeader {
    pub header: String,
    pub module_name: Option<String>,
    pub enums: Vec<NormalizedEnum>,
    pub functions: Vec<BoundFunction>,
}

pub fn generate_header(
    header: &HeaderIR,
    config: &HeaderConfig,
) -> Result<GeneratedHeader, GeneratorError> {
    let enums = header.enums.iter().map(normalize_enum).collect();

    let mut functions = Vec::new();
    for func in &header.functions {
        if let Some(bound) =
            transform_function(func, config).map_err(|e| e.in_header(&header.name))?
        {
            functions.push(bound);
        }
    }

    Ok(GeneratedHeader {
        header: header.name.clone(),
        module_name: config.module_name.clone(),
        enums,
        functions,
    })
}

pub fn write_generated(
    out_dir: &Path,
    stem: &str,
    generated: &GeneratedHeader,
) -> Result<PathBuf, GeneratorError> {
    fs::create_dir_all(out_dir).map_err(|e| {
        GeneratorError::new(
            ERR_IO,
            format!("Failed to create {}: {}", out_dir.display(), e),
        )
    })?;

    let path = out_dir.join(format!("{}{}", stem, GENERATED_SUFFIX));
    let data = serde_json::to_string_pretty(generated).map_err(|e| {
        GeneratorError::new(ERR_IO, format!("Failed to serialize {}: {}", stem, e))
            .in_header(&generated.header)
    })?;
    fs::write(&path, data).map_err(|e| {
        GeneratorError::new(
            ERR_IO,
            format!("Failed to write {}: {}", path.display(), e),
        )
    })?;

    info!(
        header = %generated.header,
        functions = generated.functions.len(),
        enums = generated.enums.len(),
        path = %path.display(),
        "wrote generated header"
    );
    Ok(path)
}

// ═══════════════════════════════════════════════════════════════════════════════
// BATCH RUN
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub input_dir: PathBuf,
    /// `None` runs every pass without writing anything.
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct GenerateResult {
    pub headers: Vec<GeneratedHeader>,
    pub written: Vec<PathBuf>,
}

/// Process every discovered header in path order, stopping at the first
/// fatal error.
pub fn generate_bindings(options: &GenerateOptions) -> Result<GenerateResult, GeneratorError> {
    let mut result = GenerateResult::default();

    for source in discover_headers(&options.input_dir)? {
        let header = load_header_ir(&source)?;
        let config = source.load_config().map_err(|e| e.in_header(&header.name))?;
        let generated = generate_header(&header, &config)?;

        if let Some(out_dir) = &options.output_dir {
            result
                .written
                .push(write_generated(out_dir, &source.stem, &generated)?);
        }
        result.headers.push(generated);
    }

    Ok(result)
}
