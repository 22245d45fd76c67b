//! Error kinds for pattern compilation, route registration, lookup, and
//! argument binding.
//!
//! Registration-time errors ([`PatternError`], [`RegisterError`]) are fatal to
//! the embedding application and should abort startup. Lookup and binding
//! errors are per-request values the caller maps to 404/405/400 responses.

use http::Method;
use std::fmt;

use crate::binder::CoerceTarget;

/// Pattern syntax or configuration error.
///
/// Raised while compiling a pattern segment or extracting variables. These
/// indicate a broken route definition, not a bad request, and are never
/// recoverable at match time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A `{` group in a segment is never closed.
    UnbalancedBrace {
        /// The offending segment text
        segment: String,
    },
    /// A segment mixes variable braces with literal text (e.g. `a{id}b`).
    ///
    /// A segment must either be a whole `{name}` / `{name:regex}` group or
    /// contain no braces at all.
    MixedVariableSegment {
        /// The offending segment text
        segment: String,
    },
    /// A `{name:regex}` group holds a regex that does not compile.
    InvalidRegex {
        /// The offending segment text
        segment: String,
        /// Compiler detail for the broken regex
        detail: String,
    },
    /// A segment's regex captured a different number of groups than the
    /// number of variable names it declares.
    ///
    /// Happens when a `{name:regex}` regex contains its own capturing
    /// groups. This is a configuration error, not a soft match failure.
    VariableCountMismatch {
        /// The offending segment text
        segment: String,
        /// Number of declared variable names
        declared: usize,
        /// Number of groups the regex captured
        captured: usize,
    },
    /// `extract_variables` was called with a pattern that does not match the
    /// path. Callers must pre-check with `matches`.
    NotMatched {
        /// The pattern that failed to match
        pattern: String,
        /// The concrete path
        path: String,
    },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::UnbalancedBrace { segment } => {
                write!(f, "unbalanced '{{' in pattern segment '{}'", segment)
            }
            PatternError::MixedVariableSegment { segment } => {
                write!(
                    f,
                    "pattern segment '{}' mixes variable braces with literal text; \
                    a segment must be a whole {{name}} group or contain no braces",
                    segment
                )
            }
            PatternError::InvalidRegex { segment, detail } => {
                write!(
                    f,
                    "pattern segment '{}' holds an invalid regex: {}",
                    segment, detail
                )
            }
            PatternError::VariableCountMismatch {
                segment,
                declared,
                captured,
            } => {
                write!(
                    f,
                    "pattern segment '{}' declares {} variable(s) but its regex captured {} group(s); \
                    regexes inside {{name:regex}} must not contain capturing groups",
                    segment, declared, captured
                )
            }
            PatternError::NotMatched { pattern, path } => {
                write!(
                    f,
                    "cannot extract variables: pattern '{}' does not match path '{}'",
                    pattern, path
                )
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// Route registration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// The new route collides with an already registered one.
    ///
    /// Raised when the new pattern, treated as a lookup path, resolves
    /// (exactly or by pattern match) to an existing entry that already maps
    /// the same HTTP method.
    Conflict {
        /// The pattern being registered (normalized)
        pattern: String,
        /// The HTTP method that collided
        method: Method,
        /// The already registered pattern it collided with
        existing_pattern: String,
        /// Handler name of the existing registration
        existing_handler: String,
        /// Handler name of the rejected registration
        new_handler: String,
    },
    /// The pattern itself is malformed.
    Pattern(PatternError),
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterError::Conflict {
                pattern,
                method,
                existing_pattern,
                existing_handler,
                new_handler,
            } => {
                write!(
                    f,
                    "duplicate route definition: {} '{}' (handler '{}') collides with \
                    already registered '{}' (handler '{}')",
                    method, pattern, new_handler, existing_pattern, existing_handler
                )
            }
            RegisterError::Pattern(err) => write!(f, "invalid route pattern: {}", err),
        }
    }
}

impl std::error::Error for RegisterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegisterError::Pattern(err) => Some(err),
            RegisterError::Conflict { .. } => None,
        }
    }
}

impl From<PatternError> for RegisterError {
    fn from(err: PatternError) -> Self {
        RegisterError::Pattern(err)
    }
}

/// Route lookup failure.
///
/// `NotFound` and `MethodNotAllowed` are distinct outcomes: the former means
/// no pattern matched the path at all (404-equivalent), the latter means a
/// pattern matched but the request's HTTP method is not registered for it
/// (405-equivalent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No registered pattern matches the request path.
    NotFound {
        /// The HTTP method of the request
        method: Method,
        /// The request path
        path: String,
    },
    /// A pattern matches but not for this HTTP method.
    MethodNotAllowed {
        /// The HTTP method of the request
        method: Method,
        /// The request path
        path: String,
        /// The winning pattern
        pattern: String,
        /// Methods that are registered for the winning pattern
        allowed: Vec<Method>,
    },
    /// A registered pattern failed to evaluate.
    ///
    /// Patterns are validated at registration, so this indicates table
    /// corruption rather than a bad request.
    Pattern(PatternError),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NotFound { method, path } => {
                write!(f, "no route matches {} '{}'", method, path)
            }
            LookupError::MethodNotAllowed {
                method,
                path,
                pattern,
                allowed,
            } => {
                write!(
                    f,
                    "method {} not allowed for '{}' (pattern '{}', allowed: {})",
                    method,
                    path,
                    pattern,
                    allowed
                        .iter()
                        .map(Method::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            LookupError::Pattern(err) => write!(f, "route evaluation failed: {}", err),
        }
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LookupError::Pattern(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PatternError> for LookupError {
    fn from(err: PatternError) -> Self {
        LookupError::Pattern(err)
    }
}

/// Argument binding failure (400-equivalent).
///
/// Always names the offending parameter so the caller can surface it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// A required named parameter is absent from the resolved values.
    MissingParameter {
        /// Declared parameter name
        name: String,
    },
    /// A declared path variable is absent from the extracted variable map.
    ///
    /// Path variables are always required.
    MissingPathVariable {
        /// Declared variable name
        name: String,
    },
    /// A body-bound parameter is declared but the request has no body.
    MissingBody,
    /// More than one body-bound parameter is declared on one handler.
    MultipleBodyParameters {
        /// Number of body-bound parameters declared
        count: usize,
    },
    /// A value could not be coerced to the parameter's declared type.
    Coercion {
        /// Declared parameter name
        name: String,
        /// The raw value that failed to coerce
        value: String,
        /// The coercion target
        target: CoerceTarget,
    },
    /// No supplied contextual object has the declared type.
    MissingContext {
        /// Type name of the declared contextual parameter
        type_name: &'static str,
    },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::MissingParameter { name } => {
                write!(f, "required parameter '{}' is missing", name)
            }
            BindError::MissingPathVariable { name } => {
                write!(f, "path variable '{}' is missing", name)
            }
            BindError::MissingBody => {
                write!(f, "handler declares a body parameter but the request has no body")
            }
            BindError::MultipleBodyParameters { count } => {
                write!(
                    f,
                    "handler declares {} body parameters; at most one is allowed",
                    count
                )
            }
            BindError::Coercion {
                name,
                value,
                target,
            } => {
                write!(
                    f,
                    "parameter '{}': cannot coerce '{}' to {}",
                    name, value, target
                )
            }
            BindError::MissingContext { type_name } => {
                write!(f, "no contextual object of type {} was supplied", type_name)
            }
        }
    }
}

impl std::error::Error for BindError {}
