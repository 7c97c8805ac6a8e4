//! Compiler error types.
#![allow(unused_assignments)]

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur during compilation.
///
/// Every parse and validation error is fatal to the whole route file: no
/// partial route list is ever emitted for a file that contains one.
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum CompilerError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Failed to access '{}': {message}", path.display())]
    #[diagnostic(code(routegen::io::access_failed))]
    IoError {
        path: PathBuf,
        message: String,
    },

    #[error("Route source not found: {}", path.display())]
    #[diagnostic(
        code(routegen::io::source_not_found),
        help("Check the `declarations` in routegen.toml or create the file")
    )]
    SourceNotFound {
        origin: String,
        path: PathBuf,
    },

    #[error("Invalid configuration in '{}': {message}", path.display())]
    #[diagnostic(code(routegen::config::invalid))]
    ConfigError {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("Line {line}: expected `<METHOD> <PATH> <HANDLER>` but found {found} field(s): {text}")]
    #[diagnostic(
        code(routegen::parse::lexical),
        help("Each route is one line, e.g. `GET /users/:id UserController.show(id: String)`")
    )]
    LexicalError {
        line: usize,
        text: String,
        found: usize,
    },

    #[error("Line {line}: unsupported HTTP method '{method}': {text}")]
    #[diagnostic(
        code(routegen::parse::invalid_method),
        help("Supported methods: GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS")
    )]
    InvalidMethod {
        line: usize,
        text: String,
        method: String,
    },

    #[error("Line {line}: invalid handler reference '{reference}' ({reason}): {text}")]
    #[diagnostic(
        code(routegen::parse::invalid_handler),
        help("Handlers look like `Controller.action(name: Type, ...)`; every segment must be an identifier")
    )]
    InvalidHandlerReference {
        line: usize,
        text: String,
        reference: String,
        reason: String,
    },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Line {line}: parameter '{name}: {type_name}' is auto-injected into every action and must not be declared: {text}")]
    #[diagnostic(
        code(routegen::validate::reserved_parameter),
        help("Remove it from the parameter list; the generated code passes the call context first")
    )]
    ReservedParameter {
        line: usize,
        text: String,
        name: String,
        type_name: String,
    },

    #[error("Line {line}: path parameter(s) {} have no matching handler parameter: {text}", format_names(missing))]
    #[diagnostic(
        code(routegen::validate::parameter_mismatch),
        help("Every `:name` in the path needs a `name: Type` entry in the handler's parameter list")
    )]
    ParameterMismatch {
        line: usize,
        text: String,
        missing: Vec<String>,
    },

    #[error("Line {line}: {kind} '{name}' is declared more than once: {text}")]
    #[diagnostic(
        code(routegen::validate::duplicate_parameter),
        help("Each name may appear once in the path and once in the parameter list")
    )]
    DuplicateParameter {
        line: usize,
        text: String,
        kind: &'static str,
        name: String,
    },

    // =========================================================================
    // Code Generation Errors
    // =========================================================================
    #[error("Invalid namespace '{namespace}': segment '{segment}' is not an identifier")]
    #[diagnostic(code(routegen::codegen::invalid_namespace))]
    InvalidNamespace {
        namespace: String,
        segment: String,
    },
}

fn format_names(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(", ")
}

impl CompilerError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Source line number for per-line parse and validation errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            CompilerError::LexicalError { line, .. }
            | CompilerError::InvalidMethod { line, .. }
            | CompilerError::InvalidHandlerReference { line, .. }
            | CompilerError::ReservedParameter { line, .. }
            | CompilerError::ParameterMismatch { line, .. }
            | CompilerError::DuplicateParameter { line, .. } => Some(*line),
            _ => None,
        }
    }
}
