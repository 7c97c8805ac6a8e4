//! # Routegen Compiler
//!
//! This crate compiles a line-oriented route DSL into Rust dispatch code.
//! Each route binds an HTTP method and path pattern to a controller action,
//! with typed parameter extraction and build-time checks that path captures
//! match the action's parameters.
//!
//! ## Architecture
//!
//! ```text
//! Route file (*.routes)
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Frontend   │  Line grammar, handler references
//! │ (text → IR)  │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Validate   │  Identifiers, reserved params,
//! │    (IR)      │  path/handler reconciliation
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Codegen    │  Controller statics +
//! │  (IR → Rust) │  register_routes()
//! └──────────────┘
//! ```
//!
//! [`compile_source`] is the pure core: text in, artifact out. [`Compiler`]
//! adds discovery of route files and persistence of the artifacts.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use routegen_compiler::{Compiler, CompilerConfig};
//!
//! let config = CompilerConfig {
//!     source_dir: "routes".into(),
//!     out_dir: "src/generated".into(),
//!     ..CompilerConfig::default()
//! };
//!
//! let result = Compiler::new(config).compile()?;
//! println!("{} routes", result.routes);
//! ```

pub mod build;
pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod discover;
pub mod frontend;
pub mod ir;
pub mod sink;
pub mod validate;

use std::path::PathBuf;

pub use codegen::{EmitOptions, GeneratedArtifact};
pub use config::CompilerConfig;
pub use diagnostic::CompilerError;
pub use discover::SourceDeclaration;
pub use ir::RouteDefinition;
pub use sink::{ArtifactSink, Dependencies, FsSink, WriteOutcome};
pub use validate::{HandlerRegistry, UnknownController};

/// Compiles route DSL text into a generated artifact.
///
/// Pure and synchronous: no file system access, no shared state.
pub fn compile_source(
    source: &str,
    options: &EmitOptions,
    file_name: &str,
) -> Result<GeneratedArtifact, CompilerError> {
    let routes = frontend::parse_routes(source)?;
    codegen::generate(&routes, options, file_name)
}

/// The main compiler struct that orchestrates discovery, compilation and output.
pub struct Compiler {
    config: CompilerConfig,
    registry: HandlerRegistry,
}

/// Routes parsed from one route file.
#[derive(Debug)]
pub struct ParsedSource {
    pub declaration: SourceDeclaration,
    pub routes: Vec<RouteDefinition>,
}

/// A declaration that was skipped because its file does not exist.
#[derive(Debug, Clone)]
pub struct SkippedSource {
    pub origin: String,
    pub path: PathBuf,
}

/// Parsed route files plus the ones that were skipped.
#[derive(Debug)]
pub struct LoadedSources {
    pub sources: Vec<ParsedSource>,
    pub skipped: Vec<SkippedSource>,
}

/// Per-artifact summary.
#[derive(Debug, Clone)]
pub struct ArtifactSummary {
    pub file_name: String,
    pub namespace: String,
    pub routes: usize,
    pub controllers: usize,
    pub outcome: WriteOutcome,
}

/// Result of a successful compilation.
#[derive(Debug)]
pub struct CompileResult {
    /// One entry per route file, followed by the index.
    pub artifacts: Vec<ArtifactSummary>,
    pub skipped: Vec<SkippedSource>,
    /// Total number of routes across all files.
    pub routes: usize,
    /// Total number of controller fields across all files.
    pub controllers: usize,
    pub unknown_controllers: Vec<UnknownController>,
}

/// Result of a check run.
#[derive(Debug)]
pub struct CheckResult {
    pub files: usize,
    pub routes: usize,
    pub controllers: usize,
    pub skipped: Vec<SkippedSource>,
    pub unknown_controllers: Vec<UnknownController>,
}

impl Compiler {
    /// Creates a new compiler with the given configuration.
    pub fn new(config: CompilerConfig) -> Self {
        let registry = HandlerRegistry::new(config.known_controllers.iter().cloned());
        Self { config, registry }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Discovers, parses and validates every route file.
    ///
    /// Missing files are logged and skipped. Any parse or validation error
    /// aborts the whole run.
    pub fn load(&self) -> Result<LoadedSources, CompilerError> {
        let mut sources = Vec::new();
        let mut skipped = Vec::new();

        for declaration in discover::discover(&self.config)? {
            let text = match read_source(&declaration) {
                Ok(text) => text,
                Err(CompilerError::SourceNotFound { origin, path }) => {
                    tracing::warn!(
                        origin = %origin,
                        path = %path.display(),
                        "route source not found, skipping"
                    );
                    skipped.push(SkippedSource { origin, path });
                    continue;
                }
                Err(err) => return Err(err),
            };

            let routes = frontend::parse_routes(&text)?;
            sources.push(ParsedSource { declaration, routes });
        }

        Ok(LoadedSources { sources, skipped })
    }

    /// Validates every route file without generating code.
    pub fn check(&self) -> Result<CheckResult, CompilerError> {
        let loaded = self.load()?;
        let mut unknown_controllers = Vec::new();
        let mut routes = 0;
        let mut controllers = 0;

        for source in &loaded.sources {
            let options = self.options_for(&source.declaration);
            // Catch namespace problems here as well, not only when emitting.
            codegen::generate(&source.routes, &options, source.declaration.artifact_file_name())?;
            routes += source.routes.len();
            controllers += codegen::names::controller_fields(&source.routes).len();
            unknown_controllers.extend(validate::check_controllers(&source.routes, &self.registry));
        }

        Ok(CheckResult {
            files: loaded.sources.len(),
            routes,
            controllers,
            skipped: loaded.skipped,
            unknown_controllers,
        })
    }

    /// Compiles every route file and writes the artifacts to `out_dir`.
    pub fn compile(&self) -> Result<CompileResult, CompilerError> {
        let mut sink = FsSink::new(&self.config.out_dir).with_cargo_directives(self.config.cargo_directives);
        self.compile_into(&mut sink)
    }

    /// Compiles every route file into `sink`.
    ///
    /// One isolating artifact is written per route file, then one
    /// aggregating index that includes them all.
    pub fn compile_into<S: ArtifactSink>(&self, sink: &mut S) -> Result<CompileResult, CompilerError> {
        let loaded = self.load()?;
        let mut artifacts = Vec::with_capacity(loaded.sources.len());
        let mut summaries = Vec::with_capacity(loaded.sources.len() + 1);
        let mut unknown_controllers = Vec::new();

        for source in &loaded.sources {
            let declaration = &source.declaration;
            unknown_controllers.extend(validate::check_controllers(&source.routes, &self.registry));

            let options = self.options_for(declaration);
            let artifact = codegen::generate(&source.routes, &options, declaration.artifact_file_name())?;
            let outcome = sink.write(
                &artifact,
                &Dependencies::Isolating {
                    origin: declaration.source_path.clone(),
                },
            )?;

            tracing::info!(
                origin = %declaration.origin,
                file = %artifact.file_name,
                routes = artifact.route_count,
                controllers = artifact.controller_count,
                "compiled route file"
            );
            summaries.push(summarize(&artifact, outcome));
            artifacts.push(artifact);
        }

        let index = codegen::generate_index(&artifacts, self.config.include_style(), &self.config.runtime_path)?;
        let origins = loaded
            .sources
            .iter()
            .map(|s| s.declaration.source_path.clone())
            .collect();
        let outcome = sink.write(&index, &Dependencies::Aggregating { origins })?;
        summaries.push(summarize(&index, outcome));

        Ok(CompileResult {
            artifacts: summaries,
            skipped: loaded.skipped,
            routes: index.route_count,
            controllers: index.controller_count,
            unknown_controllers,
        })
    }

    fn options_for(&self, declaration: &SourceDeclaration) -> EmitOptions {
        self.config
            .emit_options(&declaration.namespace, &declaration.source_name())
    }
}

fn read_source(declaration: &SourceDeclaration) -> Result<String, CompilerError> {
    let path = &declaration.source_path;
    if !path.is_file() {
        return Err(CompilerError::SourceNotFound {
            origin: declaration.origin.clone(),
            path: path.clone(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| CompilerError::io(path, e.to_string()))
}

fn summarize(artifact: &GeneratedArtifact, outcome: WriteOutcome) -> ArtifactSummary {
    ArtifactSummary {
        file_name: artifact.file_name.clone(),
        namespace: artifact.namespace.clone(),
        routes: artifact.route_count,
        controllers: artifact.controller_count,
        outcome,
    }
}
