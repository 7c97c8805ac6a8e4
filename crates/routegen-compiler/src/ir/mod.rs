//! Route records produced by the parser and consumed by the emitter.
//!
//! A `RouteDefinition` is built once per accepted source line, never mutated
//! afterwards, and does not outlive the compilation that produced it.

mod route;

pub use route::{MethodParameter, PathParameter, RouteDefinition};
pub use routegen_runtime::HttpMethod;

/// Declared type used for a path capture with no same-named handler parameter.
pub const DEFAULT_PARAM_TYPE: &str = "String";

/// Name of the request-context parameter the emitter injects into every action.
pub const CONTEXT_PARAM_NAME: &str = "call";

/// Type name of the request-context parameter.
pub const CONTEXT_TYPE_NAME: &str = "Call";
