//! Runtime configuration for generated references
//!
//! A [`RuntimeConfig`] decides how references into the support libraries are
//! namespaced. It is built once per generation run, either from defaults or
//! from a configuration document, and then shared read-only by every
//! compilation unit.
//!
//! The document is a small object with two optional string fields:
//!
//! ```json
//! { "cratePrefix": "smithy", "relativePath": "../" }
//! ```

use std::path::Path;

use ariadne::{Color, Label, Report, ReportKind, Source};
use serde::Deserialize;
use thiserror::Error;

use crate::symbol::{CargoDependency, Location};

/// Default prefix of the support crates (`smithy-types`, `smithy-http`, ...)
pub const DEFAULT_CRATE_PREFIX: &str = "smithy";

/// Default location of the support crates relative to the generated crate
pub const DEFAULT_RELATIVE_PATH: &str = "../";

/// Errors that can occur when loading a configuration document
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to parse configuration TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ConfigError {
    /// Format the error with source context using ariadne
    ///
    /// I/O errors have no source to point into and fall back to the plain message.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = match self {
            ConfigError::Io(_) => return self.to_string(),
            ConfigError::Toml(e) => e.span().unwrap_or(0..0),
            ConfigError::Json(e) => {
                let start = offset_of(source, e.line(), e.column());
                start..(start + 1).min(source.len())
            }
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message("invalid runtime configuration")
            .with_label(
                Label::new((filename, span))
                    .with_message(self.to_string())
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Byte offset of a 1-based line/column position
fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}

/// How generated code names and locates its support libraries
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct RuntimeConfig {
    /// Prefix used for crate names (`{prefix}-types`) and module paths (`{prefix}_types`)
    crate_prefix: String,
    /// Path of the directory holding the support crates
    relative_path: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            crate_prefix: DEFAULT_CRATE_PREFIX.to_string(),
            relative_path: DEFAULT_RELATIVE_PATH.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an optional document; `None` yields the defaults
    pub fn from_document(document: Option<&serde_json::Value>) -> Result<Self, ConfigError> {
        match document {
            Some(value) => Ok(Self::deserialize(value)?),
            None => Ok(Self::default()),
        }
    }

    /// Load from a JSON document
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a file, choosing the format by extension (`.json` or TOML)
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    /// Set the crate prefix
    pub fn with_crate_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.crate_prefix = prefix.into();
        self
    }

    /// Set the relative path of the support crates
    pub fn with_relative_path(mut self, path: impl Into<String>) -> Self {
        self.relative_path = path.into();
        self
    }

    pub fn crate_prefix(&self) -> &str {
        &self.crate_prefix
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Module path of a support crate, e.g. `smithy_types` for `"types"`
    pub fn crate_namespace(&self, name: &str) -> String {
        format!("{}_{}", self.crate_prefix, name)
    }

    /// Cargo dependency on a support crate, e.g. `smithy-types` for `"types"`
    pub fn runtime_crate(&self, name: &str) -> CargoDependency {
        let crate_name = format!("{}-{}", self.crate_prefix, name);
        let path = format!(
            "{}/{}",
            self.relative_path.trim_end_matches('/'),
            crate_name
        );
        CargoDependency::new(crate_name, Location::Local { path })
    }
}
