//! Validation rules shared by the parser and the emitter.

pub(crate) mod params;
mod registry;

pub use params::{check_reserved, check_unique, extract_path_parameters, reconcile};
pub use registry::{check_controllers, HandlerRegistry, UnknownController};

/// Words that are identifiers but can appear in Rust neither plain nor as `r#` raw identifiers.
pub const PATH_KEYWORDS: &[&str] = &["crate", "self", "Self", "super", "_"];

/// ASCII letter or underscore first, then ASCII letters, digits or underscores.
///
/// Matches the capture pattern, so every identifier can also be a `:name` capture.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// An identifier that can be emitted as a module, path segment or method name.
pub fn is_item_name(s: &str) -> bool {
    is_identifier(s) && !PATH_KEYWORDS.contains(&s)
}
