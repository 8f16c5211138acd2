//! Route table
//!
//! Built once before serving begins and read-only afterwards.

use hyper::Method;
use thiserror::Error;

use super::matcher::PathPattern;

/// Which handler a route dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Submission form
    Form,
    /// Liveness check
    Status,
    /// Store a new snippet
    Create,
    /// Fetch by `?id=` query parameter
    Show,
    /// Fetch by trailing path segment
    ShowPath,
}

/// A (path, allowed methods, endpoint) binding
#[derive(Debug, Clone)]
pub struct Route {
    pub pattern: PathPattern,
    pub methods: Vec<Method>,
    pub endpoint: Endpoint,
}

impl Route {
    /// Whether `method` is accepted; HEAD rides along with GET
    fn allows(&self, method: &Method) -> bool {
        self.methods.contains(method) || (*method == Method::HEAD && self.allows_get())
    }

    fn allows_get(&self) -> bool {
        self.methods.contains(&Method::GET)
    }

    /// Methods to advertise in an `Allow` header
    fn advertised_methods(&self) -> Vec<Method> {
        let mut methods = self.methods.clone();
        if self.allows_get() && !methods.contains(&Method::HEAD) {
            methods.push(Method::HEAD);
        }
        methods
    }
}

/// Successful dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch<'p> {
    pub endpoint: Endpoint,
    /// Variable segment captured by a segment route
    pub segment: Option<&'p str>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("'{0}' not found.")]
    NotFound(String),

    #[error("'{path}' is only compatible with {} methods.", join_methods(.allowed))]
    MethodNotAllowed { path: String, allowed: Vec<Method> },
}

/// Render methods as an `Allow` header value
pub fn join_methods(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ordered route table
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an exact-path route
    #[must_use]
    pub fn route(mut self, path: &str, methods: &[Method], endpoint: Endpoint) -> Self {
        self.routes.push(Route {
            pattern: PathPattern::Exact(path.to_string()),
            methods: methods.to_vec(),
            endpoint,
        });
        self
    }

    /// Register a `prefix` + one variable segment route
    #[must_use]
    pub fn route_segment(mut self, prefix: &str, methods: &[Method], endpoint: Endpoint) -> Self {
        self.routes.push(Route {
            pattern: PathPattern::Segment {
                prefix: prefix.to_string(),
            },
            methods: methods.to_vec(),
            endpoint,
        });
        self
    }

    /// Resolve a request to an endpoint
    ///
    /// Exact routes are tried before segment routes, so a registered path
    /// such as `/create` is never captured as an id. The first route whose
    /// pattern matches decides the outcome.
    pub fn dispatch<'p>(&self, method: &Method, path: &'p str) -> Result<Dispatch<'p>, RouteError> {
        let exact = self.routes.iter().filter(|r| r.pattern.is_exact());
        let segments = self.routes.iter().filter(|r| !r.pattern.is_exact());

        for route in exact.chain(segments) {
            let Some(matched) = route.pattern.capture(path) else {
                continue;
            };

            if !route.allows(method) {
                return Err(RouteError::MethodNotAllowed {
                    path: path.to_string(),
                    allowed: route.advertised_methods(),
                });
            }

            return Ok(Dispatch {
                endpoint: route.endpoint,
                segment: matched.segment,
            });
        }

        Err(RouteError::NotFound(path.to_string()))
    }
}
