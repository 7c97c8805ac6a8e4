//! Route DSL frontend.
//!
//! Turns route file text into validated [`RouteDefinition`]s. Each line is
//! handled independently and ends in one of three outcomes:
//!
//! - skipped (blank or `#` comment)
//! - accepted (one route record)
//! - rejected (a diagnostic that aborts the whole file)
//!
//! The only state carried between lines is the list of accepted records.
//!
//! ```text
//! GET  /users/:id                UserController.show(id: String)
//! POST /blog/:year/:month/:slug  blog.BlogController.showPost(year: Int, month: Int, slug: String)
//! ```

pub mod handler;
pub mod lexer;

use crate::diagnostic::{CompilerError, SourceLine};
use crate::ir::{HttpMethod, RouteDefinition};
use crate::validate;

/// Result of processing one source line.
#[derive(Debug)]
pub enum LineOutcome {
    Skip,
    Accepted(RouteDefinition),
    Rejected(CompilerError),
}

/// Parses a whole route file, failing on the first malformed line.
pub fn parse_routes(source: &str) -> Result<Vec<RouteDefinition>, CompilerError> {
    let mut routes = Vec::new();
    for line in SourceLine::enumerate(source) {
        match parse_line(line) {
            LineOutcome::Skip => {}
            LineOutcome::Accepted(route) => {
                tracing::debug!(
                    line = route.source_line,
                    method = %route.method,
                    path = %route.path,
                    handler = %route.handler_ref(),
                    "accepted route"
                );
                routes.push(route);
            }
            LineOutcome::Rejected(err) => return Err(err),
        }
    }
    Ok(routes)
}

/// Classifies and parses a single line.
pub fn parse_line(line: SourceLine<'_>) -> LineOutcome {
    let trimmed = line.text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return LineOutcome::Skip;
    }
    match parse_declaration(line) {
        Ok(route) => LineOutcome::Accepted(route),
        Err(err) => LineOutcome::Rejected(err),
    }
}

fn parse_declaration(line: SourceLine<'_>) -> Result<RouteDefinition, CompilerError> {
    let fields = lexer::split_fields(line.text);
    let [method, path, handler_field] = fields[..] else {
        return Err(CompilerError::LexicalError {
            line: line.number,
            text: line.text.to_string(),
            found: fields.len(),
        });
    };

    let method = HttpMethod::parse(method).ok_or_else(|| CompilerError::InvalidMethod {
        line: line.number,
        text: line.text.to_string(),
        method: method.to_string(),
    })?;

    let handler = handler::parse_handler(handler_field, line)?;
    validate::check_reserved(&handler.parameters, line)?;
    validate::check_unique(handler.parameters.iter().map(|p| p.name.as_str()), "handler parameter", line)?;

    let path_parameters = validate::extract_path_parameters(path, &handler.parameters);
    validate::check_unique(path_parameters.iter().map(|p| p.name.as_str()), "path parameter", line)?;
    validate::reconcile(&path_parameters, &handler.parameters, line)?;

    Ok(RouteDefinition {
        method,
        path: path.to_string(),
        controller: handler.controller,
        action: handler.action,
        path_parameters,
        method_parameters: handler.parameters,
        source_line: line.number,
    })
}
