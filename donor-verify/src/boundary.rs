#![forbid(unsafe_code)]

use std::collections::HashMap;

use donor_ir::{Function, Span, ValueId};

/// A raw function argument was donated without the boundary authorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Unauthorized {
    pub position: usize,
    pub span: Span,
}

/// Decides whether a donated value that flows in from outside the function
/// was authorized for donation at the signature.
#[derive(Debug)]
pub struct BoundaryChecker<'f> {
    func: &'f Function,
    positions: HashMap<ValueId, usize>,
}

impl<'f> BoundaryChecker<'f> {
    pub fn new(func: &'f Function) -> Self {
        let positions = func
            .args
            .iter()
            .enumerate()
            .map(|(position, arg)| (arg.value, position))
            .collect();
        Self { func, positions }
    }

    /// Values produced by operations always pass; an argument passes iff its
    /// `donated` flag is set.
    pub fn check(&self, v: ValueId) -> Result<(), Unauthorized> {
        let Some(&position) = self.positions.get(&v) else {
            return Ok(());
        };
        let arg = &self.func.args[position];
        if arg.donated {
            Ok(())
        } else {
            Err(Unauthorized {
                position,
                span: arg.span,
            })
        }
    }
}
