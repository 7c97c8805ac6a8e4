//! Discovery of route files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::codegen::names::to_snake_case;
use crate::config::CompilerConfig;
use crate::diagnostic::CompilerError;

/// Extension of route DSL files.
pub const ROUTES_EXTENSION: &str = "routes";

/// A route file to compile, plus where its artifact goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDeclaration {
    /// Stable identity of the declaration, used for rebuild tracking and logs.
    pub origin: String,
    pub source_path: PathBuf,
    pub namespace: String,
}

impl SourceDeclaration {
    /// Output file name, e.g. `admin_api_routes.rs` for namespace `admin::api`.
    pub fn artifact_file_name(&self) -> String {
        let stem = self.namespace.replace("::", "_").replace('.', "_");
        format!("{}_routes.rs", stem)
    }

    /// File name shown in generated headers.
    pub fn source_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.origin.clone())
    }
}

/// Lists the declarations described by `config`.
///
/// Explicit `declarations` win; otherwise `source_dir` is walked for
/// `*.routes` files, sorted by path so output does not depend on the file
/// system's ordering. Explicit declarations are not checked for existence
/// here; that happens when they are read.
pub fn discover(config: &CompilerConfig) -> Result<Vec<SourceDeclaration>, CompilerError> {
    if !config.declarations.is_empty() {
        return Ok(config
            .declarations
            .iter()
            .map(|decl| {
                let source_path = config.source_dir.join(&decl.source);
                let namespace = decl
                    .namespace
                    .clone()
                    .unwrap_or_else(|| namespace_for(&source_path));
                SourceDeclaration {
                    origin: decl.source.to_string_lossy().to_string(),
                    source_path,
                    namespace,
                }
            })
            .collect());
    }

    if !config.source_dir.is_dir() {
        return Err(CompilerError::SourceNotFound {
            origin: "source_dir".to_string(),
            path: config.source_dir.clone(),
        });
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(&config.source_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == ROUTES_EXTENSION))
        .collect();
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|source_path| {
            let origin = pathdiff::diff_paths(&source_path, &config.source_dir)
                .unwrap_or_else(|| source_path.clone())
                .to_string_lossy()
                .to_string();
            SourceDeclaration {
                origin,
                namespace: namespace_for(&source_path),
                source_path,
            }
        })
        .collect())
}

fn namespace_for(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    to_snake_case(&stem)
}
