//! Parsing of the `qualified.Controller.action(params)` handler reference.

use crate::diagnostic::{CompilerError, SourceLine};
use crate::ir::{MethodParameter, DEFAULT_PARAM_TYPE};
use crate::validate::{is_identifier, is_item_name};

/// A handler reference split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerRef {
    pub controller: String,
    pub action: String,
    pub parameters: Vec<MethodParameter>,
}

/// Parses the third field of a route line.
pub fn parse_handler(field: &str, line: SourceLine<'_>) -> Result<HandlerRef, CompilerError> {
    let invalid = |reason: &str| CompilerError::InvalidHandlerReference {
        line: line.number,
        text: line.text.to_string(),
        reference: field.to_string(),
        reason: reason.to_string(),
    };

    let (qualified, param_list) = match field.find('(') {
        Some(open) => {
            let close = field
                .rfind(')')
                .filter(|close| *close > open)
                .ok_or_else(|| invalid("unbalanced parentheses"))?;
            if !field[close + 1..].trim().is_empty() {
                return Err(invalid("unexpected text after ')'"));
            }
            (field[..open].trim(), &field[open + 1..close])
        }
        None => (field.trim(), ""),
    };

    let segments: Vec<&str> = qualified.split('.').collect();
    if segments.len() < 2 {
        return Err(invalid("expected `Controller.action`"));
    }
    if let Some(bad) = segments.iter().find(|s| !is_identifier(s)) {
        return Err(invalid(&format!("'{}' is not an identifier", bad)));
    }
    if let Some(bad) = segments.iter().find(|s| !is_item_name(s)) {
        return Err(invalid(&format!("'{}' cannot be used as a Rust path segment", bad)));
    }
    // Generated code binds its own names with a `__` prefix.
    if let Some(type_name) = segments.iter().rev().nth(1).filter(|s| s.starts_with("__")) {
        return Err(invalid(&format!("controller names starting with '__' are reserved ('{}')", type_name)));
    }

    let (action, controller) = segments
        .split_last()
        .map(|(action, controller)| (action.to_string(), controller.join(".")))
        .ok_or_else(|| invalid("expected `Controller.action`"))?;

    let parameters = parse_parameter_list(param_list)
        .map_err(|name| invalid(&format!("parameter name '{}' is not an identifier", name)))?;

    Ok(HandlerRef {
        controller,
        action,
        parameters,
    })
}

/// Parses `name: Type, name: Type`.
///
/// Entries without a `:` are dropped without complaint. An entry whose name
/// is not an identifier returns that name as the error.
fn parse_parameter_list(list: &str) -> Result<Vec<MethodParameter>, String> {
    let mut params = Vec::new();
    for entry in list.split(',') {
        let Some((name, type_name)) = entry.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if !is_identifier(name) {
            return Err(name.to_string());
        }
        let type_name = match type_name.trim() {
            "" => DEFAULT_PARAM_TYPE,
            t => t,
        };
        params.push(MethodParameter::new(name, type_name));
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(field: &str) -> Result<HandlerRef, CompilerError> {
        parse_handler(field, SourceLine::new(3, field))
    }

    #[test]
    fn splits_controller_and_action() {
        let handler = parse("com.example.UserController.show(id: String)").unwrap();
        assert_eq!(handler.controller, "com.example.UserController");
        assert_eq!(handler.action, "show");
        assert_eq!(handler.parameters, vec![MethodParameter::new("id", "String")]);
    }

    #[test]
    fn parameters_keep_source_order() {
        let handler = parse("Blog.showPost(year: Int, month: Int,slug:String)").unwrap();
        let names: Vec<_> = handler.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["year", "month", "slug"]);
        assert_eq!(handler.parameters[2].type_name, "String");
    }

    #[test]
    fn qualified_types_are_kept_verbatim() {
        let handler = parse("C.a(n: kotlin.Int, m: std::string::String)").unwrap();
        assert_eq!(handler.parameters[0].type_name, "kotlin.Int");
        assert_eq!(handler.parameters[1].type_name, "std::string::String");
    }

    #[test]
    fn entries_without_colon_are_dropped() {
        let handler = parse("C.a(id: Int, oops, , flag: Boolean)").unwrap();
        let names: Vec<_> = handler.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "flag"]);
    }

    #[test]
    fn empty_and_missing_parameter_lists() {
        assert!(parse("C.a()").unwrap().parameters.is_empty());
        assert!(parse("C.a").unwrap().parameters.is_empty());
    }

    #[test]
    fn requires_two_segments() {
        assert!(matches!(
            parse("show(id: Int)"),
            Err(CompilerError::InvalidHandlerReference { line: 3, .. })
        ));
    }

    #[test]
    fn rejects_invalid_identifiers() {
        assert!(parse("User-Controller.show()").is_err());
        assert!(parse("UserController.2show()").is_err());
        assert!(parse("app..UserController.show()").is_err());
        assert!(parse("C.a(bad name: Int)").is_err());
    }

    #[test]
    fn rejects_non_ascii_names() {
        assert!(parse("C.a(ñame: String)").is_err());
        assert!(parse("Café.show()").is_err());
    }

    #[test]
    fn rejects_names_rust_cannot_spell() {
        for field in ["app.C.self()", "super.C.a()", "app.Self.a()", "crate.C.a()", "C._()"] {
            assert!(
                matches!(parse(field), Err(CompilerError::InvalidHandlerReference { .. })),
                "{field}"
            );
        }
        assert!(parse("app.C.r#type()").is_err());
        assert!(parse("app.C.type()").is_ok());
    }

    #[test]
    fn rejects_reserved_controller_prefix() {
        assert!(parse("app.__call.ping()").is_err());
        assert!(parse("app.__dispatcher.ping()").is_err());
        assert!(parse("__app.Call.ping()").is_ok());
    }

    #[test]
    fn rejects_malformed_parentheses() {
        assert!(parse("C.a(id: Int").is_err());
        assert!(parse("C.a(id: Int) extra").is_err());
    }
}
