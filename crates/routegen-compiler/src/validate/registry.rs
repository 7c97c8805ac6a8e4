//! Advisory check that referenced controllers are known.
//!
//! The Rust compiler resolving the emitted controller paths is the real
//! check; this one only exists to warn early, before the generated code is
//! built.

use std::collections::BTreeSet;

use crate::ir::RouteDefinition;

/// Qualified controller names the application declares as available.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    known: BTreeSet<String>,
}

impl HandlerRegistry {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn register(&mut self, qualified_name: impl Into<String>) {
        self.known.insert(qualified_name.into());
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.known.contains(qualified_name)
    }

    /// An empty registry disables the check.
    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

/// A route whose controller is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownController {
    pub controller: String,
    pub source_line: usize,
}

/// Returns the first route line for every controller missing from `registry`.
///
/// Never fails compilation. Each unknown controller is logged once.
pub fn check_controllers(routes: &[RouteDefinition], registry: &HandlerRegistry) -> Vec<UnknownController> {
    if registry.is_empty() {
        return Vec::new();
    }

    let mut seen = BTreeSet::new();
    let mut unknown = Vec::new();
    for route in routes {
        if registry.contains(&route.controller) || !seen.insert(route.controller.as_str()) {
            continue;
        }
        tracing::warn!(
            controller = %route.controller,
            line = route.source_line,
            "controller is not listed in known_controllers"
        );
        unknown.push(UnknownController {
            controller: route.controller.clone(),
            source_line: route.source_line,
        });
    }
    unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parse_routes;

    #[test]
    fn reports_each_unknown_controller_once() {
        let routes = parse_routes(
            "GET /a app.A.one()\nGET /b app.B.two()\nGET /c app.B.three()\n",
        )
        .unwrap();
        let registry = HandlerRegistry::new(["app.A"]);

        let unknown = check_controllers(&routes, &registry);
        assert_eq!(
            unknown,
            vec![UnknownController {
                controller: "app.B".to_string(),
                source_line: 2,
            }]
        );
    }

    #[test]
    fn empty_registry_disables_check() {
        let routes = parse_routes("GET /a app.A.one()").unwrap();
        assert!(check_controllers(&routes, &HandlerRegistry::default()).is_empty());
    }
}
