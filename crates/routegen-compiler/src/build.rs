//! Helpers for calling the compiler from a Cargo build script.
//!
//! ```rust,ignore
//! // build.rs
//! fn main() {
//!     if let Err(err) = routegen_compiler::build::compile_dir("routes") {
//!         panic!("{err}");
//!     }
//! }
//!
//! // src/lib.rs
//! include!(concat!(env!("OUT_DIR"), "/routes.rs"));
//! ```

use std::path::{Path, PathBuf};

use crate::config::CompilerConfig;
use crate::diagnostic::CompilerError;
use crate::{CompileResult, Compiler};

/// Compiles every `*.routes` file under `source_dir` into `OUT_DIR`.
pub fn compile_dir(source_dir: impl AsRef<Path>) -> Result<CompileResult, CompilerError> {
    compile_with(CompilerConfig {
        source_dir: source_dir.as_ref().to_path_buf(),
        ..CompilerConfig::default()
    })
}

/// Compiles with `config`, overriding its output directory with `OUT_DIR`.
pub fn compile_with(mut config: CompilerConfig) -> Result<CompileResult, CompilerError> {
    let out_dir = std::env::var_os("OUT_DIR").ok_or_else(|| CompilerError::ConfigError {
        path: PathBuf::from("OUT_DIR"),
        message: "OUT_DIR is not set; compile_with must run inside a build script".to_string(),
    })?;

    config.out_dir = PathBuf::from(out_dir);
    config.cargo_directives = true;
    config.include_from_out_dir = true;

    // New or removed route files change the directory listing.
    println!("cargo:rerun-if-changed={}", config.source_dir.display());

    Compiler::new(config).compile()
}
