//! Argument binder - turns a handler's declared parameter list plus the
//! resolved request data into an ordered argument array.
//!
//! Binding metadata is a statically built table: every parameter declares
//! exactly one binding kind (the [`ParamSpec`] enum makes declaring more than
//! one impossible) and, where coercion applies, one [`CoerceTarget`]. The
//! binder never inspects runtime reflection; the table is produced once at
//! registration by whatever discovery mechanism the embedding application
//! uses.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tracing::debug;

use super::coerce::{self, BoundValue, CoerceTarget};
use crate::error::BindError;
use crate::pattern::VarMap;

/// Declared binding of one handler parameter.
#[derive(Debug, Clone)]
pub enum ParamSpec {
    /// A named query/form parameter, resolved case-insensitively.
    Named {
        /// Declared parameter name
        name: String,
        /// Fallback value when the parameter is absent; `None` means no default
        default: Option<String>,
        /// Whether absence (after the default) is a binding error
        required: bool,
        /// Coercion target
        target: CoerceTarget,
    },
    /// A URI template variable extracted by the router. Always required.
    PathVariable {
        /// Declared variable name
        name: String,
        /// Coercion target
        target: CoerceTarget,
    },
    /// The request body, read exactly once per request.
    Body {
        /// Coercion target
        target: CoerceTarget,
    },
    /// A contextual object supplied at invocation time (e.g. the in-flight
    /// request), matched by type.
    Contextual {
        /// `TypeId` of the declared parameter type
        type_id: TypeId,
        /// Human-readable type name for error messages
        type_name: &'static str,
    },
}

impl ParamSpec {
    /// A required named parameter with no default.
    pub fn named(name: impl Into<String>, target: CoerceTarget) -> Self {
        ParamSpec::Named {
            name: name.into(),
            default: None,
            required: true,
            target,
        }
    }

    /// An optional named parameter with no default.
    pub fn named_optional(name: impl Into<String>, target: CoerceTarget) -> Self {
        ParamSpec::Named {
            name: name.into(),
            default: None,
            required: false,
            target,
        }
    }

    /// A named parameter that falls back to `default` when absent.
    pub fn named_with_default(
        name: impl Into<String>,
        target: CoerceTarget,
        default: impl Into<String>,
    ) -> Self {
        ParamSpec::Named {
            name: name.into(),
            default: Some(default.into()),
            required: false,
            target,
        }
    }

    /// A path variable parameter.
    pub fn path_variable(name: impl Into<String>, target: CoerceTarget) -> Self {
        ParamSpec::PathVariable {
            name: name.into(),
            target,
        }
    }

    /// The body parameter.
    #[must_use]
    pub fn body(target: CoerceTarget) -> Self {
        ParamSpec::Body { target }
    }

    /// A contextual parameter of type `T`.
    #[must_use]
    pub fn contextual<T: Any>() -> Self {
        ParamSpec::Contextual {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

/// One bound argument: either a coerced value or a borrowed contextual
/// object.
pub enum BoundArg<'a> {
    /// A coerced named/path-variable/body value
    Value(BoundValue),
    /// A contextual object borrowed from the caller for this invocation
    Context(&'a dyn Any),
}

impl<'a> BoundArg<'a> {
    /// The coerced value, if this argument is one.
    #[must_use]
    pub fn value(&self) -> Option<&BoundValue> {
        match self {
            BoundArg::Value(v) => Some(v),
            BoundArg::Context(_) => None,
        }
    }

    /// Downcast a contextual argument to its concrete type.
    #[must_use]
    pub fn context<T: Any>(&self) -> Option<&'a T> {
        match self {
            BoundArg::Context(obj) => obj.downcast_ref::<T>(),
            BoundArg::Value(_) => None,
        }
    }
}

impl fmt::Debug for BoundArg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundArg::Value(v) => f.debug_tuple("Value").field(v).finish(),
            BoundArg::Context(_) => f.write_str("Context(..)"),
        }
    }
}

/// Binds resolved request data to a handler's declared parameters.
///
/// Built once per handler at registration; `bind` runs per request.
#[derive(Debug, Clone)]
pub struct ArgumentBinder {
    params: Vec<ParamSpec>,
}

impl ArgumentBinder {
    /// Validate a parameter table and build a binder for it.
    ///
    /// # Errors
    ///
    /// [`BindError::MultipleBodyParameters`] when more than one parameter is
    /// body-bound; the body can be read exactly once per request.
    pub fn new(params: Vec<ParamSpec>) -> Result<Self, BindError> {
        let bodies = params
            .iter()
            .filter(|p| matches!(p, ParamSpec::Body { .. }))
            .count();
        if bodies > 1 {
            return Err(BindError::MultipleBodyParameters { count: bodies });
        }
        Ok(ArgumentBinder { params })
    }

    /// The declared parameter table.
    #[must_use]
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Produce the ordered argument list for one invocation.
    ///
    /// # Arguments
    ///
    /// * `request_values` - named query/form parameters
    /// * `path_variables` - router-extracted URI template variables
    /// * `body` - the request body, already read by the caller (at most once)
    /// * `contexts` - contextual objects for this invocation, e.g. the
    ///   in-flight request/response
    ///
    /// # Errors
    ///
    /// [`BindError`] naming the offending parameter when a required value is
    /// absent, a coercion fails, or no context object has a declared type.
    pub fn bind<'a>(
        &self,
        request_values: &HashMap<String, String>,
        path_variables: &VarMap,
        body: Option<&Value>,
        contexts: &'a [&'a dyn Any],
    ) -> Result<Vec<BoundArg<'a>>, BindError> {
        let mut args = Vec::with_capacity(self.params.len());
        for spec in &self.params {
            let arg = match spec {
                ParamSpec::Named {
                    name,
                    default,
                    required,
                    target,
                } => {
                    let found = request_values
                        .iter()
                        .find(|(k, _)| k.eq_ignore_ascii_case(name))
                        .map(|(_, v)| v.as_str());
                    match found.or(default.as_deref()) {
                        Some(raw) => BoundArg::Value(coerce::coerce_str(name, raw, *target)?),
                        None if *required => {
                            return Err(BindError::MissingParameter { name: name.clone() })
                        }
                        None => BoundArg::Value(BoundValue::Structured(Value::Null)),
                    }
                }
                ParamSpec::PathVariable { name, target } => {
                    let found = path_variables
                        .iter()
                        .rfind(|(k, _)| k.as_ref().eq_ignore_ascii_case(name))
                        .map(|(_, v)| v.as_str());
                    match found {
                        Some(raw) => BoundArg::Value(coerce::coerce_str(name, raw, *target)?),
                        None => {
                            return Err(BindError::MissingPathVariable { name: name.clone() })
                        }
                    }
                }
                ParamSpec::Body { target } => match body {
                    Some(value) => BoundArg::Value(coerce::coerce_json("body", value, *target)?),
                    None => return Err(BindError::MissingBody),
                },
                ParamSpec::Contextual { type_id, type_name } => {
                    let found = contexts
                        .iter()
                        .copied()
                        .find(|obj| (**obj).type_id() == *type_id);
                    match found {
                        Some(obj) => BoundArg::Context(obj),
                        None => {
                            return Err(BindError::MissingContext {
                                type_name: *type_name,
                            })
                        }
                    }
                }
            };
            args.push(arg);
        }
        debug!(
            param_count = self.params.len(),
            bound_count = args.len(),
            "Arguments bound"
        );
        Ok(args)
    }
}
