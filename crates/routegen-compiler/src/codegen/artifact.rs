//! Artifact assembly.
//!
//! The artifact is built in two steps. Controller fields and per-route
//! registrations are collected as plain values first, then rendered in one
//! pass, so the output only depends on the route list and the options.

use crate::ir::RouteDefinition;
use crate::validate::params::CAPTURE;

use super::coercion::Coercion;
use super::names::{controller_fields, route_name, rust_ident, ControllerField};
use super::writer::CodeWriter;
use super::EmitOptions;

/// Where an argument value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    Path,
    Query,
}

/// One `let` binding at the top of a registration body.
///
/// Generated locals carry a `__` prefix so controller statics and action
/// parameters cannot shadow them.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub name: String,
    pub declared: String,
    pub source: ParamSource,
    pub coercion: Coercion,
}

impl Extraction {
    fn binding(&self) -> String {
        format!("__arg_{}", self.name)
    }
}

/// One `__dispatcher.route(...)` call.
#[derive(Debug, Clone)]
pub struct Registration {
    pub route: RouteDefinition,
    pub name: String,
    pub pattern: String,
    pub field_name: String,
    /// Path parameters first, then the remaining handler parameters.
    pub extractions: Vec<Extraction>,
}

/// Collects fields and registrations before rendering.
pub struct ArtifactBuilder<'a> {
    options: &'a EmitOptions,
    fields: Vec<ControllerField>,
    registrations: Vec<Registration>,
}

impl<'a> ArtifactBuilder<'a> {
    pub fn new(options: &'a EmitOptions, routes: &[RouteDefinition]) -> Self {
        let fields = controller_fields(routes);
        let mut builder = Self {
            options,
            fields,
            registrations: Vec::with_capacity(routes.len()),
        };
        for route in routes {
            builder.push_route(route);
        }
        builder
    }

    pub fn fields(&self) -> &[ControllerField] {
        &self.fields
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    fn push_route(&mut self, route: &RouteDefinition) {
        let field_name = self
            .fields
            .iter()
            .find(|f| f.qualified_name == route.controller)
            .map(|f| f.field_name.clone())
            .unwrap_or_default();

        let path_extractions = route.path_parameters.iter().map(|p| Extraction {
            name: p.name.clone(),
            declared: p.type_name.clone(),
            source: ParamSource::Path,
            coercion: Coercion::classify(&p.type_name),
        });
        let query_extractions = route.query_parameters().map(|p| Extraction {
            name: p.name.clone(),
            declared: p.type_name.clone(),
            source: ParamSource::Query,
            coercion: Coercion::classify(&p.type_name),
        });

        self.registrations.push(Registration {
            route: route.clone(),
            name: route_name(route.method, &route.path),
            pattern: dispatcher_pattern(&route.path),
            field_name,
            extractions: path_extractions.chain(query_extractions).collect(),
        });
    }

    /// Renders the artifact source.
    pub fn render(&self) -> String {
        let runtime = self.options.runtime_path.as_str();
        let mut w = CodeWriter::new();

        w.line(format!(
            "// @generated by routegen from {}. Do not edit.",
            self.options.source_name
        ));
        w.line(format!(
            "// {} route(s), {} controller(s).",
            self.registrations.len(),
            self.fields.len()
        ));
        w.blank();

        let modules = self.options.namespace_segments();
        for module in &modules {
            w.open(format!("pub mod {} {{", rust_ident(module)));
        }

        for field in &self.fields {
            w.line("#[allow(non_upper_case_globals)]");
            w.line(format!(
                "static {}: ::std::sync::LazyLock<{}> =",
                rust_ident(&field.field_name),
                self.controller_path(&field.qualified_name)
            ));
            w.line("    ::std::sync::LazyLock::new(::std::default::Default::default);");
            w.blank();
        }

        w.line(format!(
            "/// Registers every route declared in {}.",
            self.options.source_name
        ));
        w.line("#[allow(non_snake_case, unused_variables)]");
        w.open(format!(
            "pub fn register_routes<D: {}::Dispatcher>(__dispatcher: &mut D) {{",
            runtime
        ));
        for (i, registration) in self.registrations.iter().enumerate() {
            if i > 0 {
                w.blank();
            }
            self.render_registration(&mut w, registration);
        }
        w.close("}");

        for _ in &modules {
            w.close("}");
        }

        w.finish()
    }

    fn render_registration(&self, w: &mut CodeWriter, registration: &Registration) {
        let runtime = self.options.runtime_path.as_str();
        let route = &registration.route;

        w.line(format!(
            "// line {}: {} {} -> {}",
            route.source_line,
            route.method,
            route.path,
            route.handler_ref()
        ));
        w.open("__dispatcher.route(");
        w.line(format!("{}::HttpMethod::{},", runtime, route.method.variant_name()));
        w.line(format!("{:?},", registration.pattern));
        w.line(format!("{:?},", registration.name));
        w.open(format!(
            "|__call: &mut {rt}::Call| -> {rt}::HandlerResult {{",
            rt = runtime
        ));

        for extraction in &registration.extractions {
            let getter = match extraction.source {
                ParamSource::Path => "path_param",
                ParamSource::Query => "query_param",
            };
            w.line(format!(
                "let {}: {} = __call.{}({:?}, {:?})?;",
                extraction.binding(),
                extraction.coercion.rust_type(),
                getter,
                extraction.name,
                extraction.declared
            ));
        }

        let mut args = vec!["__call".to_string()];
        args.extend(registration.extractions.iter().map(Extraction::binding));
        w.line(format!(
            "{}.{}({})",
            rust_ident(&registration.field_name),
            rust_ident(&route.action),
            args.join(", ")
        ));

        w.close("},");
        w.close(");");
    }

    fn controller_path(&self, qualified_name: &str) -> String {
        let segments = qualified_name.split('.').map(rust_ident);
        let root = self.options.controller_root.trim();
        if root.is_empty() {
            segments.collect::<Vec<_>>().join("::")
        } else {
            std::iter::once(root.to_string())
                .chain(segments)
                .collect::<Vec<_>>()
                .join("::")
        }
    }
}

/// Rewrites `:name` captures into the dispatcher's `{name}` syntax.
pub fn dispatcher_pattern(path: &str) -> String {
    CAPTURE.replace_all(path, "{${1}}").into_owned()
}
