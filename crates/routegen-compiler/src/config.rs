//! Compiler configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::codegen::{EmitOptions, IncludeStyle};
use crate::diagnostic::CompilerError;

/// Default name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "routegen.toml";

/// Configuration for the routegen compiler.
///
/// Every field has a default, so an empty `routegen.toml` is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Directory scanned for `*.routes` files.
    pub source_dir: PathBuf,

    /// Directory to write generated Rust code.
    pub out_dir: PathBuf,

    /// Path prefix controllers are resolved under.
    pub controller_root: String,

    /// Path of the runtime crate as seen from generated code.
    pub runtime_path: String,

    /// Qualified controller names used for the advisory existence check.
    pub known_controllers: Vec<String>,

    /// Print `cargo:rerun-if-changed` lines (build scripts only).
    pub cargo_directives: bool,

    /// Make the index include artifacts via `OUT_DIR`.
    pub include_from_out_dir: bool,

    /// Explicit route files. When non-empty, `source_dir` is not scanned.
    pub declarations: Vec<DeclarationConfig>,
}

/// One explicitly listed route file.
#[derive(Debug, Clone, Deserialize)]
pub struct DeclarationConfig {
    /// Path relative to `source_dir`.
    pub source: PathBuf,
    /// Module the artifact is wrapped in; defaults to the file stem.
    #[serde(default)]
    pub namespace: Option<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("routes"),
            out_dir: PathBuf::from("src/generated"),
            controller_root: "crate".to_string(),
            runtime_path: "::routegen_runtime".to_string(),
            known_controllers: Vec::new(),
            cargo_directives: false,
            include_from_out_dir: false,
            declarations: Vec::new(),
        }
    }
}

impl CompilerConfig {
    /// Loads a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, CompilerError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|e| CompilerError::io(path, e.to_string()))?;
        toml::from_str(&text).map_err(|e| CompilerError::ConfigError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Emitter options for one route file.
    pub fn emit_options(&self, namespace: &str, source_name: &str) -> EmitOptions {
        EmitOptions {
            namespace: namespace.to_string(),
            controller_root: self.controller_root.clone(),
            runtime_path: self.runtime_path.clone(),
            source_name: source_name.to_string(),
        }
    }

    pub fn include_style(&self) -> IncludeStyle {
        if self.include_from_out_dir {
            IncludeStyle::OutDir
        } else {
            IncludeStyle::Relative
        }
    }
}
