//! Declared parameter type to Rust type mapping.

/// How a raw request string is converted before reaching the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    Int,
    Long,
    Float,
    Double,
    Boolean,
    /// Passed through untouched; cannot fail.
    Text,
}

impl Coercion {
    /// Classifies a declared type name.
    ///
    /// Case-insensitive, and only the last `.` / `::` segment counts, so
    /// `Int`, `int` and `kotlin.Int` are the same.
    pub fn classify(declared: &str) -> Self {
        let bare = declared
            .rsplit(|c| c == '.' || c == ':')
            .next()
            .unwrap_or(declared)
            .trim()
            .to_ascii_lowercase();
        match bare.as_str() {
            "int" | "integer" | "i32" => Coercion::Int,
            "long" | "i64" => Coercion::Long,
            "float" | "f32" => Coercion::Float,
            "double" | "f64" => Coercion::Double,
            "boolean" | "bool" => Coercion::Boolean,
            _ => Coercion::Text,
        }
    }

    /// Rust type the value is parsed into.
    pub fn rust_type(&self) -> &'static str {
        match self {
            Coercion::Int => "i32",
            Coercion::Long => "i64",
            Coercion::Float => "f32",
            Coercion::Double => "f64",
            Coercion::Boolean => "bool",
            Coercion::Text => "::std::string::String",
        }
    }
}
