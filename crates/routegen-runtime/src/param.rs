//! Conversion of raw path/query strings into typed handler arguments.

/// A type that can be produced from a raw request parameter.
///
/// Returning `None` means the value was present but malformed; callers turn
/// that into [`DispatchError::Coercion`](crate::DispatchError::Coercion).
pub trait FromParam: Sized {
    fn from_param(raw: &str) -> Option<Self>;
}

impl FromParam for String {
    fn from_param(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

macro_rules! impl_from_param_via_parse {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromParam for $ty {
                fn from_param(raw: &str) -> Option<Self> {
                    raw.parse().ok()
                }
            }
        )*
    };
}

// bool::from_str only accepts "true" and "false", which is the strict parse we want.
impl_from_param_via_parse!(i32, i64, f32, f64, bool);
