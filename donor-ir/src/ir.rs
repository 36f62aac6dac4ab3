#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::span::{Span, detached, span_serde};

/// Identity of an SSA value. Compared by handle only, never by content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueId(pub u32);

/// Identity of an operation: its position in the function body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpId(pub u32);

impl OpId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where a value comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueDef {
    /// Raw function argument at `position`.
    Arg { position: usize },
    /// Output `index` of operation `op`.
    OpResult { op: OpId, index: usize },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionTags {
    /// Donation-checked program function.
    #[serde(default)]
    pub program: bool,
    /// Donation-checked reshard function.
    #[serde(default)]
    pub reshard: bool,
}

impl FunctionTags {
    pub fn program() -> Self {
        Self { program: true, reshard: false }
    }

    pub fn reshard() -> Self {
        Self { program: false, reshard: true }
    }

    pub fn any(&self) -> bool {
        self.program || self.reshard
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    pub value: ValueId,
    /// Boundary authorization: callers agreed to donate this argument.
    #[serde(default)]
    pub donated: bool,
    #[serde(with = "span_serde", default = "detached")]
    pub span: Span,
}

/// `inputs[input]` is consumed to produce `outputs[output]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoAlias {
    pub input: usize,
    pub output: usize,
}

impl IoAlias {
    pub fn new(input: usize, output: usize) -> Self {
        Self { input, output }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    #[default]
    Call,
    CallLoadedExecutable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    CopyArrays,
    RemapArrays,
    Reshard,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOp {
    #[serde(default)]
    pub kind: CallKind,
    pub callee: String,
    pub inputs: Vec<ValueId>,
    pub outputs: Vec<ValueId>,
    #[serde(default)]
    pub io_aliases: Vec<IoAlias>,
}

impl CallOp {
    /// Whether some alias pair consumes `inputs[index]`.
    pub fn is_aliased_input(&self, index: usize) -> bool {
        self.io_aliases.iter().any(|a| a.input == index)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOp {
    pub kind: TransferKind,
    pub inputs: Vec<ValueId>,
    pub outputs: Vec<ValueId>,
    /// Applies to every input.
    #[serde(default)]
    pub donated: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnOp {
    pub operands: Vec<ValueId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherOp {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<ValueId>,
    #[serde(default)]
    pub outputs: Vec<ValueId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OpKind {
    /// `call` / `call_loaded_executable`: donation through `io_aliases`.
    CallLike(CallOp),
    /// `copy_arrays` / `remap_arrays` / `reshard`: donation through one flag.
    TransferLike(TransferOp),
    /// Function terminator.
    Return(ReturnOp),
    /// Anything else. Not part of the donation model.
    Other(OtherOp),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: OpId,
    #[serde(with = "span_serde", default = "detached")]
    pub span: Span,
    pub kind: OpKind,
}

impl Operation {
    pub fn name(&self) -> &str {
        match &self.kind {
            OpKind::CallLike(c) => match c.kind {
                CallKind::Call => "call",
                CallKind::CallLoadedExecutable => "call_loaded_executable",
            },
            OpKind::TransferLike(t) => match t.kind {
                TransferKind::CopyArrays => "copy_arrays",
                TransferKind::RemapArrays => "remap_arrays",
                TransferKind::Reshard => "reshard",
            },
            OpKind::Return(_) => "return",
            OpKind::Other(o) => &o.name,
        }
    }

    pub fn inputs(&self) -> &[ValueId] {
        match &self.kind {
            OpKind::CallLike(c) => &c.inputs,
            OpKind::TransferLike(t) => &t.inputs,
            OpKind::Return(r) => &r.operands,
            OpKind::Other(o) => &o.inputs,
        }
    }

    pub fn outputs(&self) -> &[ValueId] {
        match &self.kind {
            OpKind::CallLike(c) => &c.outputs,
            OpKind::TransferLike(t) => &t.outputs,
            OpKind::Return(_) => &[],
            OpKind::Other(o) => &o.outputs,
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self.kind, OpKind::Return(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    #[serde(with = "span_serde", default = "detached")]
    pub span: Span,
    #[serde(default)]
    pub tags: FunctionTags,
    #[serde(default)]
    pub args: Vec<Argument>,
    pub ops: Vec<Operation>,
}

impl Function {
    /// Functions without either tag are outside the donation discipline.
    pub fn is_donation_checked(&self) -> bool {
        self.tags.any()
    }

    /// Position of `v` in the parameter list, if it is a raw argument.
    pub fn arg_position(&self, v: ValueId) -> Option<usize> {
        self.args.iter().position(|a| a.value == v)
    }

    pub fn value_def(&self, v: ValueId) -> Option<ValueDef> {
        if let Some(position) = self.arg_position(v) {
            return Some(ValueDef::Arg { position });
        }
        self.ops.iter().find_map(|op| {
            op.outputs()
                .iter()
                .position(|o| *o == v)
                .map(|index| ValueDef::OpResult { op: op.id, index })
        })
    }

    pub fn op(&self, id: OpId) -> Option<&Operation> {
        match self.ops.get(id.index()) {
            Some(op) if op.id == id => Some(op),
            _ => self.ops.iter().find(|op| op.id == id),
        }
    }

    /// Printable name: `%argN` for arguments, `%N` for everything else.
    pub fn value_name(&self, v: ValueId) -> String {
        match self.arg_position(v) {
            Some(position) => format!("%arg{position}"),
            None => format!("%{}", v.0),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    /// Source text the spans in this module point into, relative to the module file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    pub functions: Vec<Function>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_file: None,
            functions: Vec::new(),
        }
    }
}

#[derive(Default, Debug)]
pub struct IdGen {
    next_value: u32,
    next_op: u32,
}

impl IdGen {
    pub fn fresh_value(&mut self) -> ValueId {
        let id = ValueId(self.next_value);
        self.next_value += 1;
        id
    }

    pub fn fresh_op(&mut self) -> OpId {
        let id = OpId(self.next_op);
        self.next_op += 1;
        id
    }
}
