//! Persistence of generated artifacts.

use std::path::{Path, PathBuf};

use crate::codegen::GeneratedArtifact;
use crate::diagnostic::CompilerError;

/// The inputs an artifact was generated from.
///
/// Build tools use this to decide what to regenerate: an isolating artifact
/// only needs rebuilding when its one source changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependencies {
    /// Generated from exactly one route file.
    Isolating { origin: PathBuf },
    /// Generated from several route files.
    Aggregating { origins: Vec<PathBuf> },
}

impl Dependencies {
    pub fn origins(&self) -> &[PathBuf] {
        match self {
            Dependencies::Isolating { origin } => std::slice::from_ref(origin),
            Dependencies::Aggregating { origins } => origins,
        }
    }

    pub fn is_aggregating(&self) -> bool {
        matches!(self, Dependencies::Aggregating { .. })
    }
}

/// What a sink did with an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The existing file already had identical content.
    Unchanged,
}

/// Receives generated artifacts and stores them somewhere.
pub trait ArtifactSink {
    fn write(
        &mut self,
        artifact: &GeneratedArtifact,
        dependencies: &Dependencies,
    ) -> Result<WriteOutcome, CompilerError>;
}

/// Writes artifacts into a directory.
#[derive(Debug, Clone)]
pub struct FsSink {
    out_dir: PathBuf,
    cargo_directives: bool,
}

impl FsSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            cargo_directives: false,
        }
    }

    /// Also print `cargo:rerun-if-changed` for every dependency.
    pub fn with_cargo_directives(mut self, enabled: bool) -> Self {
        self.cargo_directives = enabled;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

impl ArtifactSink for FsSink {
    fn write(
        &mut self,
        artifact: &GeneratedArtifact,
        dependencies: &Dependencies,
    ) -> Result<WriteOutcome, CompilerError> {
        if self.cargo_directives {
            for origin in dependencies.origins() {
                println!("cargo:rerun-if-changed={}", origin.display());
            }
        }

        std::fs::create_dir_all(&self.out_dir)
            .map_err(|e| CompilerError::io(&self.out_dir, e.to_string()))?;

        let path = self.out_dir.join(&artifact.file_name);
        if let Ok(existing) = std::fs::read_to_string(&path) {
            if existing == artifact.code {
                tracing::debug!(path = %path.display(), "artifact unchanged");
                return Ok(WriteOutcome::Unchanged);
            }
        }

        std::fs::write(&path, &artifact.code).map_err(|e| CompilerError::io(&path, e.to_string()))?;
        tracing::debug!(
            path = %path.display(),
            aggregating = dependencies.is_aggregating(),
            "wrote artifact"
        );
        Ok(WriteOutcome::Written)
    }
}
