#![forbid(unsafe_code)]

use miette::Diagnostic;
use thiserror::Error;

use crate::span::Span;

/// Structural problems in a function body. These are rejected before any
/// donation checking runs.
#[derive(Debug, Clone, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum IrError {
    #[error("function @{function} has an empty body")]
    #[diagnostic(code(donor::ir::empty_body), help("every function must end in a `return`"))]
    EmptyBody {
        function: String,
        #[label("declared here")]
        span: Span,
    },

    #[error("function @{function} does not end in a `return`")]
    #[diagnostic(code(donor::ir::missing_return))]
    MissingReturn {
        function: String,
        #[label("last operation")]
        span: Span,
    },

    #[error("`return` in @{function} is not the last operation")]
    #[diagnostic(code(donor::ir::misplaced_return))]
    MisplacedReturn {
        function: String,
        #[label("early return")]
        span: Span,
    },

    #[error("operation at position {position} of @{function} carries id #{id}")]
    #[diagnostic(code(donor::ir::op_id), help("operation ids must match program order"))]
    OpIdMismatch {
        function: String,
        position: usize,
        id: u32,
        #[label]
        span: Span,
    },

    #[error("io_alias {input} -> {output} of `{op}` in @{function} is out of range ({inputs} inputs, {outputs} outputs)")]
    #[diagnostic(code(donor::ir::io_alias))]
    AliasOutOfRange {
        function: String,
        op: String,
        input: usize,
        output: usize,
        inputs: usize,
        outputs: usize,
        #[label]
        span: Span,
    },

    #[error("value %{value} is defined more than once in @{function}")]
    #[diagnostic(code(donor::ir::redefined_value))]
    RedefinedValue {
        function: String,
        value: u32,
        #[label("redefined here")]
        span: Span,
    },

    #[error("value %{value} is used by `{op}` in @{function} before it is defined")]
    #[diagnostic(code(donor::ir::undefined_value))]
    UndefinedValue {
        function: String,
        op: String,
        value: u32,
        #[label]
        span: Span,
    },

    #[error("invalid module json: {message}")]
    #[diagnostic(code(donor::ir::json))]
    Json { message: String },
}

impl From<serde_json::Error> for IrError {
    fn from(e: serde_json::Error) -> Self {
        IrError::Json {
            message: e.to_string(),
        }
    }
}
