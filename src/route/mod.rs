//! # Route Module
//!
//! Route handler metadata: the [`Handler`] trait and the
//! [`HandlerDescriptor`] record the route table stores per pattern/method.

mod types;

pub use types::{Handler, HandlerDescriptor};
