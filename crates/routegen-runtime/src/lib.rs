//! # Routegen Runtime
//!
//! The dispatcher contract that code generated by `routegen-compiler` is
//! written against.
//!
//! Generated code only ever touches four things from this crate:
//!
//! - [`HttpMethod`] to name the verb of a registration
//! - [`Dispatcher`] to register a pattern and its handler
//! - [`Call`] to pull path/query values and write the response
//! - [`HandlerResult`] as the return type of every controller action
//!
//! [`Router`] is a small in-memory [`Dispatcher`] used by tests and by
//! applications that don't need a full HTTP stack.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use routegen_runtime::{HttpMethod, Router};
//!
//! let mut router = Router::new();
//! generated::register_routes(&mut router);
//!
//! let response = router.handle(HttpMethod::Get, "/users/42?verbose=true");
//! assert_eq!(response.status, 200);
//! ```

pub mod call;
pub mod error;
pub mod method;
pub mod param;
pub mod router;

pub use call::{Call, Response};
pub use error::{DispatchError, HandlerResult};
pub use method::HttpMethod;
pub use param::FromParam;
pub use router::{RouteInfo, Router};

/// A routing table that generated code registers into.
///
/// Implementations decide how patterns are matched and which registration
/// wins when two share the same method and pattern.
pub trait Dispatcher {
    /// Registers `handler` for `method` requests matching `pattern`.
    ///
    /// `pattern` uses `{name}` for captures. `name` is the canonical route
    /// identifier derived at compile time.
    fn route<H>(&mut self, method: HttpMethod, pattern: &str, name: &str, handler: H)
    where
        H: Fn(&mut Call) -> HandlerResult + Send + Sync + 'static;
}
