//! The aggregating index that pulls every per-file artifact together.

use crate::diagnostic::CompilerError;

use super::names::rust_ident;
use super::writer::CodeWriter;
use super::GeneratedArtifact;

pub const INDEX_FILE_NAME: &str = "routes.rs";

/// How the index refers to the per-file artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncludeStyle {
    /// `include!("file.rs")`, resolved next to the index.
    #[default]
    Relative,
    /// `include!(concat!(env!("OUT_DIR"), "/file.rs"))`, for build scripts.
    OutDir,
}

/// Generates `routes.rs`, which includes every artifact and exposes `register_all`.
///
/// Artifacts must live in distinct top-level modules, otherwise their
/// `register_routes` functions would collide.
pub fn generate_index(
    artifacts: &[GeneratedArtifact],
    style: IncludeStyle,
    runtime_path: &str,
) -> Result<GeneratedArtifact, CompilerError> {
    let mut roots: Vec<&str> = Vec::new();
    for artifact in artifacts {
        let root = artifact.namespace.split("::").next().unwrap_or_default();
        if root.is_empty() || roots.contains(&root) {
            return Err(CompilerError::InvalidNamespace {
                namespace: artifact.namespace.clone(),
                segment: root.to_string(),
            });
        }
        roots.push(root);
    }

    let mut w = CodeWriter::new();
    w.line("// @generated by routegen. Do not edit.");
    w.blank();
    for artifact in artifacts {
        match style {
            IncludeStyle::Relative => w.line(format!("include!({:?});", artifact.file_name)),
            IncludeStyle::OutDir => w.line(format!(
                "include!(concat!(env!(\"OUT_DIR\"), {:?}));",
                format!("/{}", artifact.file_name)
            )),
        }
    }
    w.blank();
    w.line("/// Registers the routes of every route file, in discovery order.");
    w.line("#[allow(unused_variables)]");
    w.open(format!(
        "pub fn register_all<D: {}::Dispatcher>(__dispatcher: &mut D) {{",
        runtime_path
    ));
    for artifact in artifacts {
        let module = artifact.namespace.split("::").map(rust_ident).collect::<Vec<_>>().join("::");
        w.line(format!("{}::register_routes(__dispatcher);", module));
    }
    w.close("}");

    Ok(GeneratedArtifact {
        file_name: INDEX_FILE_NAME.to_string(),
        namespace: String::new(),
        code: w.finish(),
        route_count: artifacts.iter().map(|a| a.route_count).sum(),
        controller_count: artifacts.iter().map(|a| a.controller_count).sum(),
    })
}
