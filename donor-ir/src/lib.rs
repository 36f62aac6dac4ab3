#![forbid(unsafe_code)]

//! In-memory IR for distributed array programs: values, the closed set of
//! operation kinds that matter for donation, and functions.

pub mod builder;
pub mod error;
pub mod ir;
pub mod pretty;
pub mod span;
mod validate;

pub use builder::FunctionBuilder;
pub use error::IrError;
pub use ir::*;
pub use span::{Span, SpanRange, span};
