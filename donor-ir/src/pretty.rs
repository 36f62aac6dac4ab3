#![forbid(unsafe_code)]

use std::fmt;

use crate::ir::{Function, Module, OpKind, Operation, ValueId};

struct ValueList<'a> {
    func: &'a Function,
    values: &'a [ValueId],
}

impl fmt::Display for ValueList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&self.func.value_name(*v))?;
        }
        Ok(())
    }
}

fn list<'a>(func: &'a Function, values: &'a [ValueId]) -> ValueList<'a> {
    ValueList { func, values }
}

fn write_op(f: &mut fmt::Formatter<'_>, func: &Function, op: &Operation) -> fmt::Result {
    let outputs = op.outputs();
    if !outputs.is_empty() {
        write!(f, "{} = ", list(func, outputs))?;
    }
    match &op.kind {
        OpKind::CallLike(call) => {
            write!(f, "{} @{}({})", op.name(), call.callee, list(func, &call.inputs))?;
            if !call.io_aliases.is_empty() {
                f.write_str(" io_aliases [")?;
                for (i, a) in call.io_aliases.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} -> {}", a.input, a.output)?;
                }
                f.write_str("]")?;
            }
        }
        OpKind::TransferLike(t) => {
            write!(f, "{}({})", op.name(), list(func, &t.inputs))?;
            if t.donated {
                f.write_str(" {donated}")?;
            }
        }
        OpKind::Return(r) => {
            f.write_str("return")?;
            if !r.operands.is_empty() {
                write!(f, " {}", list(func, &r.operands))?;
            }
        }
        OpKind::Other(o) => write!(f, "\"{}\"({})", o.name, list(func, &o.inputs))?,
    }
    Ok(())
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "func @{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "%arg{i}")?;
            if arg.donated {
                f.write_str(" {donated}")?;
            }
        }
        f.write_str(")")?;
        match (self.tags.program, self.tags.reshard) {
            (true, true) => f.write_str(" attributes {program, reshard}")?,
            (true, false) => f.write_str(" attributes {program}")?,
            (false, true) => f.write_str(" attributes {reshard}")?,
            (false, false) => {}
        }
        f.write_str(" {\n")?;
        for op in &self.ops {
            f.write_str("  ")?;
            write_op(f, self, op)?;
            f.write_str("\n")?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "// module {}", self.name)?;
        for func in &self.functions {
            writeln!(f, "{func}")?;
        }
        Ok(())
    }
}
