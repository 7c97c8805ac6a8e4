//! Dispatch-time errors raised by generated code and the router.

use thiserror::Error;

use crate::method::HttpMethod;

/// Result type returned by every controller action.
pub type HandlerResult = Result<(), DispatchError>;

/// Errors that can occur while dispatching a request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// A path or query value was present but could not be converted.
    #[error("Parameter '{name}' must be a valid {declared} (got '{value}')")]
    Coercion {
        name: String,
        declared: String,
        value: String,
    },

    #[error("Missing required query parameter '{name}'")]
    MissingQueryParameter { name: String },

    /// The dispatcher matched a pattern but did not supply one of its captures.
    #[error("Path parameter '{name}' was not captured by the route pattern")]
    MissingPathParameter { name: String },

    #[error("No route for {method} {path}")]
    NotFound { method: HttpMethod, path: String },

    #[error("Method {method} not allowed for {path}")]
    MethodNotAllowed { method: HttpMethod, path: String },

    /// Raised by controller actions to fail with a status of their choosing.
    #[error("{message}")]
    Status { status: u16, message: String },
}

impl DispatchError {
    /// Creates a handler-chosen failure.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            DispatchError::Coercion { .. } => 400,
            DispatchError::MissingQueryParameter { .. } => 400,
            DispatchError::MissingPathParameter { .. } => 500,
            DispatchError::NotFound { .. } => 404,
            DispatchError::MethodNotAllowed { .. } => 405,
            DispatchError::Status { status, .. } => *status,
        }
    }

    /// True for 4xx failures caused by the request itself.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercion_is_a_client_error_naming_the_parameter() {
        let err = DispatchError::Coercion {
            name: "year".to_string(),
            declared: "Int".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(err.status_code(), 400);
        assert!(err.is_client_error());
        assert!(err.to_string().contains("year"));
        assert!(err.to_string().contains("Int"));
    }

    #[test]
    fn missing_path_parameter_is_a_server_error() {
        let err = DispatchError::MissingPathParameter {
            name: "id".to_string(),
        };
        assert_eq!(err.status_code(), 500);
        assert!(!err.is_client_error());
    }

    #[test]
    fn handler_status_passes_through() {
        let err = DispatchError::status(409, "already exists");
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.to_string(), "already exists");
    }
}
