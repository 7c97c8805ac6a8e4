//! The request/response context handed to every controller action.

use std::collections::HashMap;

use crate::error::DispatchError;
use crate::method::HttpMethod;
use crate::param::FromParam;

/// Response written by a controller action.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Response {
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.into(),
        }
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::text(200, "")
    }
}

/// Request context injected as the first argument of every action.
#[derive(Debug, Clone)]
pub struct Call {
    pub method: HttpMethod,
    pub path: String,
    path_params: HashMap<String, String>,
    query_params: HashMap<String, String>,
    pub response: Response,
}

impl Call {
    /// Creates a call with no captures or query values.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            path_params: HashMap::new(),
            query_params: HashMap::new(),
            response: Response::default(),
        }
    }

    pub fn with_path_params(mut self, params: HashMap<String, String>) -> Self {
        self.path_params = params;
        self
    }

    /// Sets the query values. For repeated keys the first value is kept.
    pub fn with_query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            self.query_params.entry(key.into()).or_insert_with(|| value.into());
        }
        self
    }

    pub fn raw_path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    pub fn raw_query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    /// Extracts and coerces a captured path value.
    ///
    /// A missing capture means the dispatcher and the pattern disagree, which
    /// is reported as a server error rather than a bad request.
    pub fn path_param<T: FromParam>(&self, name: &str, declared: &str) -> Result<T, DispatchError> {
        let raw = self
            .raw_path_param(name)
            .ok_or_else(|| DispatchError::MissingPathParameter {
                name: name.to_string(),
            })?;
        coerce(name, declared, raw)
    }

    /// Extracts and coerces a query value. Absence is a client error.
    pub fn query_param<T: FromParam>(&self, name: &str, declared: &str) -> Result<T, DispatchError> {
        let raw = self
            .raw_query_param(name)
            .ok_or_else(|| DispatchError::MissingQueryParameter {
                name: name.to_string(),
            })?;
        coerce(name, declared, raw)
    }

    pub fn set_status(&mut self, status: u16) {
        self.response.status = status;
    }

    pub fn respond_text(&mut self, status: u16, body: impl Into<String>) {
        self.response = Response::text(status, body);
    }

    pub fn respond_json(&mut self, status: u16, body: impl Into<String>) {
        self.response = Response::json(status, body);
    }
}

fn coerce<T: FromParam>(name: &str, declared: &str, raw: &str) -> Result<T, DispatchError> {
    T::from_param(raw).ok_or_else(|| DispatchError::Coercion {
        name: name.to_string(),
        declared: declared.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call_with(path: &[(&str, &str)], query: &[(&str, &str)]) -> Call {
        let path_params = path
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Call::new(HttpMethod::Get, "/test")
            .with_path_params(path_params)
            .with_query(query.iter().copied())
    }

    #[test]
    fn coerces_path_values() {
        let call = call_with(&[("year", "2024")], &[]);
        let year: i32 = call.path_param("year", "Int").unwrap();
        assert_eq!(year, 2024);
    }

    #[test]
    fn malformed_path_value_names_parameter_and_type() {
        let call = call_with(&[("year", "twenty")], &[]);
        let err = call.path_param::<i32>("year", "Int").unwrap_err();
        assert_eq!(
            err,
            DispatchError::Coercion {
                name: "year".to_string(),
                declared: "Int".to_string(),
                value: "twenty".to_string(),
            }
        );
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn absent_capture_is_a_server_error() {
        let call = call_with(&[], &[]);
        let err = call.path_param::<String>("id", "String").unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn absent_query_value_is_a_client_error() {
        let call = call_with(&[], &[]);
        let err = call.query_param::<i32>("limit", "Int").unwrap_err();
        assert_eq!(
            err,
            DispatchError::MissingQueryParameter {
                name: "limit".to_string()
            }
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn first_repeated_query_value_wins() {
        let call = call_with(&[], &[("tag", "a"), ("tag", "b")]);
        assert_eq!(call.raw_query_param("tag"), Some("a"));
    }

    #[test]
    fn respond_replaces_response() {
        let mut call = call_with(&[], &[]);
        call.respond_json(201, "{\"ok\":true}");
        assert_eq!(call.response.status, 201);
        assert_eq!(call.response.content_type, "application/json");
    }
}
