use http::Method;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::binder::{BoundArg, ParamSpec};

/// A route handler: the bound target for one registered route.
///
/// The binder produces the ordered argument list; the dispatch layer (outside
/// this crate) decides when and on which thread to invoke.
pub trait Handler: Send + Sync {
    /// Invoke the handler with its bound arguments.
    fn invoke(&self, args: &[BoundArg<'_>]) -> Value;
}

impl<F> Handler for F
where
    F: Fn(&[BoundArg<'_>]) -> Value + Send + Sync,
{
    fn invoke(&self, args: &[BoundArg<'_>]) -> Value {
        self(args)
    }
}

/// Everything registered for one route/method set: the handler, its declared
/// parameter bindings, the allowed HTTP methods, and any static key-value
/// parameters attached at registration.
///
/// Descriptors are created once at registration and live for the process
/// lifetime, shared across concurrently in-flight requests. They carry no
/// per-request state; match-extracted variables travel in
/// [`RouteMatch`](crate::router::RouteMatch).
#[derive(Clone)]
pub struct HandlerDescriptor {
    /// The bound handler (shared, not owned by the router)
    pub handler: Arc<dyn Handler>,
    /// Handler name for logging and conflict reporting
    pub handler_name: String,
    /// Declared parameter bindings, in invocation order
    pub params: Vec<ParamSpec>,
    /// HTTP methods this descriptor was registered for
    pub methods: HashSet<Method>,
    /// Static key-value parameters attached at registration
    pub attachments: HashMap<String, String>,
}

impl HandlerDescriptor {
    /// Create a descriptor with no parameters or attachments.
    pub fn new(handler_name: impl Into<String>, handler: impl Handler + 'static) -> Self {
        HandlerDescriptor {
            handler: Arc::new(handler),
            handler_name: handler_name.into(),
            params: Vec::new(),
            methods: HashSet::new(),
            attachments: HashMap::new(),
        }
    }

    /// Set the declared parameter bindings.
    #[must_use]
    pub fn with_params(mut self, params: Vec<ParamSpec>) -> Self {
        self.params = params;
        self
    }

    /// Attach a static key-value parameter.
    #[must_use]
    pub fn with_attachment(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attachments.insert(key.into(), value.into());
        self
    }

    /// Look up a static attachment by key.
    #[must_use]
    pub fn attachment(&self, key: &str) -> Option<&str> {
        self.attachments.get(key).map(String::as_str)
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("handler_name", &self.handler_name)
            .field("params", &self.params)
            .field("methods", &self.methods)
            .field("attachments", &self.attachments)
            .finish_non_exhaustive()
    }
}
