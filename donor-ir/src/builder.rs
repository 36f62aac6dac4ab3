#![forbid(unsafe_code)]

use crate::error::IrError;
use crate::ir::{
    Argument, CallKind, CallOp, Function, FunctionTags, IdGen, IoAlias, OpId, OpKind, Operation,
    OtherOp, ReturnOp, TransferKind, TransferOp, ValueId,
};
use crate::span::{Span, detached};

/// Builds a [`Function`] in program order, handing out fresh value and op ids.
///
/// ```
/// use donor_ir::{FunctionBuilder, FunctionTags};
///
/// let mut b = FunctionBuilder::new("main").tags(FunctionTags::program());
/// let a0 = b.arg("a0", true);
/// let (_, outs) = b.call("step", &[a0], 1, &[(0, 0)]);
/// b.ret(&outs);
/// let f = b.finish().unwrap();
/// assert_eq!(f.ops.len(), 2);
/// ```
#[derive(Debug)]
pub struct FunctionBuilder {
    name: String,
    span: Span,
    tags: FunctionTags,
    args: Vec<Argument>,
    ops: Vec<Operation>,
    ids: IdGen,
    next_span: Option<Span>,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            span: detached(),
            tags: FunctionTags::default(),
            args: Vec::new(),
            ops: Vec::new(),
            ids: IdGen::default(),
            next_span: None,
        }
    }

    pub fn tags(mut self, tags: FunctionTags) -> Self {
        self.tags = tags;
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Span attached to the next operation (or argument) added.
    pub fn at(&mut self, span: Span) -> &mut Self {
        self.next_span = Some(span);
        self
    }

    pub fn arg(&mut self, name: impl Into<String>, donated: bool) -> ValueId {
        let value = self.ids.fresh_value();
        let span = self.take_span();
        self.args.push(Argument {
            name: name.into(),
            value,
            donated,
            span,
        });
        value
    }

    pub fn call(
        &mut self,
        callee: impl Into<String>,
        inputs: &[ValueId],
        num_outputs: usize,
        io_aliases: &[(usize, usize)],
    ) -> (OpId, Vec<ValueId>) {
        self.call_like(CallKind::Call, callee.into(), inputs, num_outputs, io_aliases)
    }

    pub fn call_loaded_executable(
        &mut self,
        callee: impl Into<String>,
        inputs: &[ValueId],
        num_outputs: usize,
        io_aliases: &[(usize, usize)],
    ) -> (OpId, Vec<ValueId>) {
        self.call_like(
            CallKind::CallLoadedExecutable,
            callee.into(),
            inputs,
            num_outputs,
            io_aliases,
        )
    }

    /// Transfer ops produce one output per input.
    pub fn transfer(
        &mut self,
        kind: TransferKind,
        inputs: &[ValueId],
        donated: bool,
    ) -> (OpId, Vec<ValueId>) {
        let outputs = self.fresh_values(inputs.len());
        let id = self.push(OpKind::TransferLike(TransferOp {
            kind,
            inputs: inputs.to_vec(),
            outputs: outputs.clone(),
            donated,
        }));
        (id, outputs)
    }

    pub fn other(
        &mut self,
        name: impl Into<String>,
        inputs: &[ValueId],
        num_outputs: usize,
    ) -> (OpId, Vec<ValueId>) {
        let outputs = self.fresh_values(num_outputs);
        let id = self.push(OpKind::Other(OtherOp {
            name: name.into(),
            inputs: inputs.to_vec(),
            outputs: outputs.clone(),
        }));
        (id, outputs)
    }

    pub fn ret(&mut self, operands: &[ValueId]) -> OpId {
        self.push(OpKind::Return(ReturnOp {
            operands: operands.to_vec(),
        }))
    }

    /// Finishes the body and checks it with [`Function::validate`].
    pub fn finish(self) -> Result<Function, IrError> {
        let f = Function {
            name: self.name,
            span: self.span,
            tags: self.tags,
            args: self.args,
            ops: self.ops,
        };
        f.validate()?;
        Ok(f)
    }

    fn call_like(
        &mut self,
        kind: CallKind,
        callee: String,
        inputs: &[ValueId],
        num_outputs: usize,
        io_aliases: &[(usize, usize)],
    ) -> (OpId, Vec<ValueId>) {
        let outputs = self.fresh_values(num_outputs);
        let id = self.push(OpKind::CallLike(CallOp {
            kind,
            callee,
            inputs: inputs.to_vec(),
            outputs: outputs.clone(),
            io_aliases: io_aliases
                .iter()
                .map(|&(input, output)| IoAlias::new(input, output))
                .collect(),
        }));
        (id, outputs)
    }

    fn fresh_values(&mut self, n: usize) -> Vec<ValueId> {
        (0..n).map(|_| self.ids.fresh_value()).collect()
    }

    fn push(&mut self, kind: OpKind) -> OpId {
        let id = self.ids.fresh_op();
        let span = self.take_span();
        self.ops.push(Operation { id, span, kind });
        id
    }

    fn take_span(&mut self) -> Span {
        self.next_span.take().unwrap_or_else(detached)
    }
}
