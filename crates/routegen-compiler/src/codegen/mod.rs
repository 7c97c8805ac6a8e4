//! Rust code generation from validated route records.
//!
//! The emitter produces one artifact per route file:
//!
//! - one private `static` per distinct controller, default-constructed on
//!   first use and shared by every route that names it
//! - one `pub fn register_routes` that registers every route, in source
//!   order, against a `routegen_runtime::Dispatcher`
//!
//! Each registration extracts path captures, then query values, coerces them
//! per the declared types, and calls the action with the request context
//! first. Duplicate `(method, path)` pairs are registered independently;
//! which one wins is up to the dispatcher.

mod artifact;
mod coercion;
mod index;
pub mod names;
mod writer;

pub use artifact::{dispatcher_pattern, ArtifactBuilder, Extraction, ParamSource, Registration};
pub use coercion::Coercion;
pub use index::{generate_index, IncludeStyle, INDEX_FILE_NAME};
pub use names::{controller_field_name, route_name, ControllerField};

use crate::diagnostic::CompilerError;
use crate::ir::RouteDefinition;
use crate::validate::is_item_name;

/// Inputs to the emitter besides the routes themselves.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Module path the artifact is wrapped in (`.` or `::` separated). Empty for none.
    pub namespace: String,
    /// Path prefix for controller types, `crate` by default.
    pub controller_root: String,
    /// Path of the runtime crate as seen from the generated code.
    pub runtime_path: String,
    /// Route file name, shown in the generated header.
    pub source_name: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            controller_root: "crate".to_string(),
            runtime_path: "::routegen_runtime".to_string(),
            source_name: "routes".to_string(),
        }
    }
}

impl EmitOptions {
    pub fn namespace_segments(&self) -> Vec<&str> {
        split_namespace(&self.namespace)
    }

    /// Rust path of the namespace, e.g. `admin::api`.
    pub fn namespace_path(&self) -> String {
        self.namespace_segments().join("::")
    }

    fn validate(&self) -> Result<(), CompilerError> {
        match self.namespace_segments().into_iter().find(|s| !is_item_name(s)) {
            Some(segment) => Err(CompilerError::InvalidNamespace {
                namespace: self.namespace.clone(),
                segment: segment.to_string(),
            }),
            None => Ok(()),
        }
    }
}

fn split_namespace(namespace: &str) -> Vec<&str> {
    let namespace = namespace.trim();
    if namespace.is_empty() {
        return Vec::new();
    }
    namespace
        .split("::")
        .flat_map(|part| part.split('.'))
        .map(str::trim)
        .collect()
}

/// Generated Rust source for one route file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    /// File name inside the output directory.
    pub file_name: String,
    pub namespace: String,
    pub code: String,
    pub route_count: usize,
    pub controller_count: usize,
}

/// Emits the artifact for a validated route list.
pub fn generate(
    routes: &[RouteDefinition],
    options: &EmitOptions,
    file_name: impl Into<String>,
) -> Result<GeneratedArtifact, CompilerError> {
    options.validate()?;

    let builder = ArtifactBuilder::new(options, routes);
    let code = builder.render();

    Ok(GeneratedArtifact {
        file_name: file_name.into(),
        namespace: options.namespace_path(),
        code,
        route_count: builder.registrations().len(),
        controller_count: builder.fields().len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parse_routes;

    const BLOG: &str = "\
# blog
GET /blog/:year/:month/:slug BlogController.showPost(year: Int, month: Int, slug: String)
";

    fn emit(source: &str, options: &EmitOptions) -> String {
        let routes = parse_routes(source).unwrap();
        generate(&routes, options, "routes.rs").unwrap().code
    }

    #[test]
    fn coerces_and_orders_blog_parameters() {
        let code = emit(BLOG, &EmitOptions::default());

        assert!(code.contains("\"/blog/{year}/{month}/{slug}\","));
        assert!(code.contains("\"get_blog_year_month_slug\","));
        assert!(code.contains("let __arg_year: i32 = __call.path_param(\"year\", \"Int\")?;"));
        assert!(code.contains("let __arg_month: i32 = __call.path_param(\"month\", \"Int\")?;"));
        assert!(code.contains(
            "let __arg_slug: ::std::string::String = __call.path_param(\"slug\", \"String\")?;"
        ));
        assert!(code.contains("blogController.showPost(__call, __arg_year, __arg_month, __arg_slug)"));
        assert!(code.contains("// line 2: GET /blog/:year/:month/:slug -> BlogController.showPost"));
    }

    #[test]
    fn non_path_parameters_come_from_query_after_path_parameters() {
        let code = emit(
            "GET /users/:id UserController.show(verbose: Boolean, id: Long, score: Double)",
            &EmitOptions::default(),
        );

        assert!(code.contains("let __arg_id: i64 = __call.path_param(\"id\", \"Long\")?;"));
        assert!(code.contains("let __arg_verbose: bool = __call.query_param(\"verbose\", \"Boolean\")?;"));
        assert!(code.contains("let __arg_score: f64 = __call.query_param(\"score\", \"Double\")?;"));
        assert!(code.contains("userController.show(__call, __arg_id, __arg_verbose, __arg_score)"));
        let id_at = code.find("let __arg_id").unwrap();
        let verbose_at = code.find("let __arg_verbose").unwrap();
        assert!(id_at < verbose_at);
    }

    #[test]
    fn one_field_per_controller() {
        let source = "\
GET /users UserController.list()
GET /users/:id UserController.show(id: String)
GET /posts PostController.list()
";
        let code = emit(source, &EmitOptions::default());

        assert_eq!(code.matches("static userController:").count(), 1);
        assert_eq!(code.matches("static postController:").count(), 1);
        assert!(code.contains(
            "static userController: ::std::sync::LazyLock<crate::UserController> ="
        ));
        let user_at = code.find("static userController").unwrap();
        let post_at = code.find("static postController").unwrap();
        assert!(user_at < post_at);
        assert!(code.contains("// 3 route(s), 2 controller(s)."));
    }

    #[test]
    fn qualified_controllers_map_to_module_paths() {
        let options = EmitOptions {
            controller_root: "crate::web".to_string(),
            ..EmitOptions::default()
        };
        let code = emit("GET /a controllers.admin.AdminController.index()", &options);
        assert!(code.contains("LazyLock<crate::web::controllers::admin::AdminController>"));
        assert!(code.contains("adminController.index(__call)"));
    }

    #[test]
    fn wraps_in_namespace_modules() {
        let options = EmitOptions {
            namespace: "api.v1".to_string(),
            ..EmitOptions::default()
        };
        let code = emit("GET /a A.b()", &options);
        assert!(code.contains("pub mod api {\n    pub mod v1 {\n"));
        assert!(code.contains(
            "        pub fn register_routes<D: ::routegen_runtime::Dispatcher>(__dispatcher: &mut D) {"
        ));
        assert!(code.ends_with("    }\n}\n"));
    }

    #[test]
    fn rejects_invalid_namespace() {
        let options = EmitOptions {
            namespace: "api.2fast".to_string(),
            ..EmitOptions::default()
        };
        let routes = parse_routes("GET /a A.b()").unwrap();
        assert!(matches!(
            generate(&routes, &options, "x.rs"),
            Err(CompilerError::InvalidNamespace { .. })
        ));
    }

    #[test]
    fn controller_statics_do_not_shadow_generated_locals() {
        let source = "\
GET /p      app.Call.ping()
GET /d/:id  app.Dispatcher.show(id: Int)
";
        let code = emit(source, &EmitOptions::default());
        assert!(code.contains("static call: ::std::sync::LazyLock<crate::app::Call> ="));
        assert!(code.contains("static dispatcher: ::std::sync::LazyLock<crate::app::Dispatcher> ="));
        assert!(code.contains("|__call: &mut ::routegen_runtime::Call| -> ::routegen_runtime::HandlerResult {"));
        assert!(code.contains("call.ping(__call)"));
        assert!(code.contains("dispatcher.show(__call, __arg_id)"));
        assert_eq!(code.matches("__dispatcher.route(").count(), 2);
        assert!(!code.contains("(call"));
        assert!(!code.contains(" dispatcher.route("));
    }

    #[test]
    fn path_keyword_namespaces_are_rejected() {
        let routes = parse_routes("GET /a A.b()").unwrap();
        for namespace in ["self", "api.super", "crate", "Self"] {
            let options = EmitOptions {
                namespace: namespace.to_string(),
                ..EmitOptions::default()
            };
            assert!(
                matches!(generate(&routes, &options, "x.rs"), Err(CompilerError::InvalidNamespace { .. })),
                "{namespace}"
            );
        }
    }

    #[test]
    fn duplicate_routes_are_both_registered() {
        let code = emit("GET /a A.one()\nGET /a A.two()\n", &EmitOptions::default());
        assert_eq!(code.matches("\"get_a\",").count(), 2);
        let one = code.find("a.one(__call)").unwrap();
        let two = code.find("a.two(__call)").unwrap();
        assert!(one < two);
    }

    #[test]
    fn output_is_deterministic() {
        let source = "\
GET    /users/:id  app.UserController.show(id: Long)
POST   /users      app.UserController.create(name: String, admin: Boolean)
DELETE /posts/:id  app.PostController.remove(id: Int)
";
        let routes = parse_routes(source).unwrap();
        let options = EmitOptions::default();
        let first = generate(&routes, &options, "r.rs").unwrap();
        let second = generate(&routes, &options, "r.rs").unwrap();
        assert_eq!(first.code.as_bytes(), second.code.as_bytes());
    }

    #[test]
    fn escapes_literals_and_keywords() {
        let code = emit("GET /say/\"hi\" Api.type()", &EmitOptions::default());
        assert!(code.contains(r#""/say/\"hi\"","#));
        assert!(code.contains("api.r#type(__call)"));
    }

    #[test]
    fn empty_route_list_still_emits_routine() {
        let code = emit("# nothing yet\n", &EmitOptions::default());
        assert!(code.contains("pub fn register_routes"));
        assert!(!code.contains("static "));
    }
}
