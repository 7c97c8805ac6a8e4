use serde::Serialize;

use super::HttpMethod;

/// One `:name` capture in a path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathParameter {
    pub name: String,
    pub type_name: String,
}

/// One declared handler-action parameter, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodParameter {
    pub name: String,
    pub type_name: String,
}

impl MethodParameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A validated route declaration.
///
/// Every path parameter name also appears among `method_parameters`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDefinition {
    pub method: HttpMethod,
    pub path: String,
    /// Dotted qualified name of the controller type.
    pub controller: String,
    pub action: String,
    pub path_parameters: Vec<PathParameter>,
    pub method_parameters: Vec<MethodParameter>,
    /// 1-based line in the route file, for diagnostics only.
    pub source_line: usize,
}

impl RouteDefinition {
    /// Handler parameters that are not bound from the path, in declared order.
    pub fn query_parameters(&self) -> impl Iterator<Item = &MethodParameter> {
        self.method_parameters
            .iter()
            .filter(|p| !self.path_parameters.iter().any(|pp| pp.name == p.name))
    }

    /// `Controller.action` as written in the route file.
    pub fn handler_ref(&self) -> String {
        format!("{}.{}", self.controller, self.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_parameters_exclude_path_captures() {
        let route = RouteDefinition {
            method: HttpMethod::Get,
            path: "/users/:id".to_string(),
            controller: "UserController".to_string(),
            action: "show".to_string(),
            path_parameters: vec![PathParameter {
                name: "id".to_string(),
                type_name: "Long".to_string(),
            }],
            method_parameters: vec![
                MethodParameter::new("verbose", "Boolean"),
                MethodParameter::new("id", "Long"),
            ],
            source_line: 1,
        };

        let names: Vec<_> = route.query_parameters().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["verbose"]);
        assert_eq!(route.handler_ref(), "UserController.show");
    }
}
