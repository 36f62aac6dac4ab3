#![forbid(unsafe_code)]

use std::collections::HashSet;

use crate::error::IrError;
use crate::ir::{Function, Module, OpKind};

impl Function {
    /// Structural well-formedness: one trailing `return`, op ids in program
    /// order, io_aliases in range, SSA values defined once and before use.
    pub fn validate(&self) -> Result<(), IrError> {
        let Some(last) = self.ops.last() else {
            return Err(IrError::EmptyBody {
                function: self.name.clone(),
                span: self.span,
            });
        };
        if !last.is_return() {
            return Err(IrError::MissingReturn {
                function: self.name.clone(),
                span: last.span,
            });
        }

        let mut defined: HashSet<_> = HashSet::new();
        for arg in &self.args {
            if !defined.insert(arg.value) {
                return Err(IrError::RedefinedValue {
                    function: self.name.clone(),
                    value: arg.value.0,
                    span: arg.span,
                });
            }
        }

        let body_len = self.ops.len();
        for (position, op) in self.ops.iter().enumerate() {
            if op.id.index() != position {
                return Err(IrError::OpIdMismatch {
                    function: self.name.clone(),
                    position,
                    id: op.id.0,
                    span: op.span,
                });
            }
            if op.is_return() && position + 1 != body_len {
                return Err(IrError::MisplacedReturn {
                    function: self.name.clone(),
                    span: op.span,
                });
            }
            if let OpKind::CallLike(call) = &op.kind {
                for alias in &call.io_aliases {
                    if alias.input >= call.inputs.len() || alias.output >= call.outputs.len() {
                        return Err(IrError::AliasOutOfRange {
                            function: self.name.clone(),
                            op: op.name().to_string(),
                            input: alias.input,
                            output: alias.output,
                            inputs: call.inputs.len(),
                            outputs: call.outputs.len(),
                            span: op.span,
                        });
                    }
                }
            }
            for v in op.inputs() {
                if !defined.contains(v) {
                    return Err(IrError::UndefinedValue {
                        function: self.name.clone(),
                        op: op.name().to_string(),
                        value: v.0,
                        span: op.span,
                    });
                }
            }
            for v in op.outputs() {
                if !defined.insert(*v) {
                    return Err(IrError::RedefinedValue {
                        function: self.name.clone(),
                        value: v.0,
                        span: op.span,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Module {
    pub fn validate(&self) -> Result<(), IrError> {
        self.functions.iter().try_for_each(Function::validate)
    }

    pub fn from_json(text: &str) -> Result<Self, IrError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, IrError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
