//! Small application wired through generated routes.
//!
//! `build.rs` compiles `routes/*.routes` into `OUT_DIR`; the index is
//! included below and exposes `register_all`.

pub mod controllers;

use routegen_runtime::Router;

include!(concat!(env!("OUT_DIR"), "/routes.rs"));

/// Builds a router with every generated route registered.
pub fn router() -> Router {
    let mut router = Router::new();
    register_all(&mut router);
    router
}
