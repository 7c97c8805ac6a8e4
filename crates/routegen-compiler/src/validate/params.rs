//! Path capture extraction and cross-validation against handler parameters.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::diagnostic::{CompilerError, SourceLine};
use crate::ir::{MethodParameter, PathParameter, CONTEXT_PARAM_NAME, CONTEXT_TYPE_NAME, DEFAULT_PARAM_TYPE};

/// `:` followed by an identifier.
pub(crate) static CAPTURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)").expect("capture pattern is valid"));

/// Extracts the `:name` captures of `path`, typed from same-named handler parameters.
///
/// A capture without a same-named handler parameter falls back to the default
/// string type; `reconcile` rejects such routes afterwards.
pub fn extract_path_parameters(path: &str, handler_params: &[MethodParameter]) -> Vec<PathParameter> {
    CAPTURE
        .captures_iter(path)
        .map(|caps| {
            let name = caps[1].to_string();
            let type_name = handler_params
                .iter()
                .find(|p| p.name == name)
                .map(|p| p.type_name.clone())
                .unwrap_or_else(|| DEFAULT_PARAM_TYPE.to_string());
            PathParameter { name, type_name }
        })
        .collect()
}

/// Fails when the handler declares the auto-injected context parameter.
pub fn check_reserved(params: &[MethodParameter], line: SourceLine<'_>) -> Result<(), CompilerError> {
    match params
        .iter()
        .find(|p| p.name == CONTEXT_PARAM_NAME && is_context_type(&p.type_name))
    {
        Some(param) => Err(CompilerError::ReservedParameter {
            line: line.number,
            text: line.text.to_string(),
            name: param.name.clone(),
            type_name: param.type_name.clone(),
        }),
        None => Ok(()),
    }
}

/// Every path capture must have a same-named handler parameter.
///
/// All missing names are reported together.
pub fn reconcile(
    path_params: &[PathParameter],
    handler_params: &[MethodParameter],
    line: SourceLine<'_>,
) -> Result<(), CompilerError> {
    let missing: Vec<String> = path_params
        .iter()
        .filter(|pp| !handler_params.iter().any(|hp| hp.name == pp.name))
        .map(|pp| pp.name.clone())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CompilerError::ParameterMismatch {
            line: line.number,
            text: line.text.to_string(),
            missing,
        })
    }
}

/// Fails on the first name that appears twice.
///
/// `kind` names the list in the error ("path parameter", "handler parameter").
pub fn check_unique<'a>(
    names: impl IntoIterator<Item = &'a str>,
    kind: &'static str,
    line: SourceLine<'_>,
) -> Result<(), CompilerError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(CompilerError::DuplicateParameter {
                line: line.number,
                text: line.text.to_string(),
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Accepts `Call` bare or qualified with `.` or `::`.
fn is_context_type(type_name: &str) -> bool {
    last_segment(type_name) == CONTEXT_TYPE_NAME
}

pub(crate) fn last_segment(qualified: &str) -> &str {
    qualified
        .rsplit(|c| c == '.' || c == ':')
        .next()
        .unwrap_or(qualified)
        .trim()
}
