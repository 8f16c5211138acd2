//! Routing module
//!
//! Maps a (method, path) pair to a registered endpoint:
//! - Exact path routes and prefix + one variable segment routes
//! - Per-route allowed methods, reported back on 405

mod matcher;
mod router;

pub use matcher::{PathMatch, PathPattern};
pub use router::{join_methods, Dispatch, Endpoint, Route, RouteError, Router};
