//! Deterministic naming for routes, controller fields and Rust identifiers.

use crate::ir::{HttpMethod, RouteDefinition};
use crate::validate::PATH_KEYWORDS;

/// Canonical route identifier: `get_users_id` for `GET /users/:id`.
pub fn route_name(method: HttpMethod, path: &str) -> String {
    let path = path.strip_prefix('/').unwrap_or(path);
    let path: String = path
        .chars()
        .filter(|c| *c != ':')
        .map(|c| if c == '/' || c == '-' { '_' } else { c })
        .collect();
    format!("{}_{}", method.as_str().to_lowercase(), path)
}

/// Field name holding the shared controller instance: last segment, first char lower-cased.
pub fn controller_field_name(qualified_name: &str) -> String {
    let last = qualified_name.rsplit('.').next().unwrap_or(qualified_name);
    let mut chars = last.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// One shared controller instance in the generated artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerField {
    pub qualified_name: String,
    pub field_name: String,
}

/// Distinct controllers in first-seen order.
///
/// Two different controllers with the same last segment get a numeric suffix
/// on the later one so field names stay unique. A field that would be `crate`,
/// `super` or `self` is suffixed the same way, since those cannot be raw identifiers.
pub fn controller_fields(routes: &[RouteDefinition]) -> Vec<ControllerField> {
    let mut fields: Vec<ControllerField> = Vec::new();
    for route in routes {
        if fields.iter().any(|f| f.qualified_name == route.controller) {
            continue;
        }
        let base = controller_field_name(&route.controller);
        let mut field_name = base.clone();
        let mut ordinal = 1;
        while PATH_KEYWORDS.contains(&field_name.as_str()) || fields.iter().any(|f| f.field_name == field_name) {
            ordinal += 1;
            field_name = format!("{}{}", base, ordinal);
        }
        fields.push(ControllerField {
            qualified_name: route.controller.clone(),
            field_name,
        });
    }
    fields
}

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Renders an identifier, escaping Rust keywords as raw identifiers.
pub fn rust_ident(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        format!("r#{}", name)
    } else {
        name.to_string()
    }
}

/// Converts a PascalCase, camelCase or kebab-case name to snake_case.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else if c == '-' || c == ' ' || c == '.' {
            result.push('_');
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parse_routes;

    #[test]
    fn route_names() {
        assert_eq!(route_name(HttpMethod::Get, "/users/:id"), "get_users_id");
        assert_eq!(
            route_name(HttpMethod::Post, "/blog-posts/:postId/comments"),
            "post_blog_posts_postId_comments"
        );
        assert_eq!(route_name(HttpMethod::Options, "/"), "options_");
    }

    #[test]
    fn route_names_are_identifiers() {
        let paths = ["/", "/a/b-c/:d", "/:x/:y_z", "/api/v1/items/:item_id/tags"];
        for method in HttpMethod::ALL {
            for path in paths {
                let name = route_name(method, path);
                let mut chars = name.chars();
                let first = chars.next().unwrap();
                assert!(first.is_ascii_alphabetic() || first == '_', "{name}");
                assert!(chars.all(|c| c.is_ascii_alphanumeric() || c == '_'), "{name}");
            }
        }
    }

    #[test]
    fn field_names() {
        assert_eq!(controller_field_name("UserController"), "userController");
        assert_eq!(controller_field_name("com.example.BlogController"), "blogController");
        assert_eq!(controller_field_name("app.api"), "api");
    }

    #[test]
    fn fields_are_deduplicated_in_first_seen_order() {
        let routes = parse_routes(
            "GET /b web.Blog.list()\nGET /u web.User.show()\nPOST /b web.Blog.create()\n",
        )
        .unwrap();
        let fields = controller_fields(&routes);
        let names: Vec<_> = fields.iter().map(|f| f.field_name.as_str()).collect();
        assert_eq!(names, vec!["blog", "user"]);
    }

    #[test]
    fn colliding_field_names_get_suffix() {
        let routes = parse_routes(
            "GET /a admin.UserController.a()\nGET /b public.UserController.b()\n",
        )
        .unwrap();
        let fields = controller_fields(&routes);
        assert_eq!(fields[0].field_name, "userController");
        assert_eq!(fields[1].field_name, "userController2");
    }

    #[test]
    fn path_keyword_fields_get_suffix() {
        let routes = parse_routes("GET /a app.Crate.a()\nGET /b app.Super.b()\n").unwrap();
        let names: Vec<_> = controller_fields(&routes).into_iter().map(|f| f.field_name).collect();
        assert_eq!(names, vec!["crate2", "super2"]);
    }

    #[test]
    fn escapes_keywords() {
        assert_eq!(rust_ident("type"), "r#type");
        assert_eq!(rust_ident("show"), "show");
    }

    #[test]
    fn snake_case() {
        assert_eq!(to_snake_case("AdminRoutes"), "admin_routes");
        assert_eq!(to_snake_case("public-api"), "public_api");
        assert_eq!(to_snake_case("app"), "app");
    }
}
