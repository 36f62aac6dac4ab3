#![forbid(unsafe_code)]

//! Per-kind donation rules. Each rule reads and updates the ledger built by
//! every earlier operation of the function.

use donor_ir::{CallOp, Function, OpKind, Operation, ReturnOp, TransferOp, ValueId};

use crate::boundary::BoundaryChecker;
use crate::error::{DonationError, OpSite, ValueRef};
use crate::ledger::DonationLedger;

pub(crate) struct RuleContext<'f> {
    func: &'f Function,
    boundary: BoundaryChecker<'f>,
    ledger: DonationLedger<'f>,
}

impl<'f> RuleContext<'f> {
    pub(crate) fn new(func: &'f Function) -> Self {
        Self {
            func,
            boundary: BoundaryChecker::new(func),
            ledger: DonationLedger::new(),
        }
    }

    pub(crate) fn ledger(&self) -> &DonationLedger<'f> {
        &self.ledger
    }

    pub(crate) fn apply(&mut self, op: &'f Operation) -> Result<(), DonationError> {
        match &op.kind {
            OpKind::CallLike(call) => self.call_like(op, call),
            OpKind::TransferLike(transfer) => self.transfer_like(op, transfer),
            OpKind::Return(ret) => self.ret(op, ret),
            OpKind::Other(_) => Ok(()),
        }
    }

    fn call_like(&mut self, op: &'f Operation, call: &CallOp) -> Result<(), DonationError> {
        // Aliased inputs are recorded before the plain inputs are scanned, so
        // `call(%a {donated}, %a)` is caught at this op.
        for alias in &call.io_aliases {
            let Some(&v) = call.inputs.get(alias.input) else {
                return Err(DonationError::MalformedIoAlias {
                    function: self.func.name.clone(),
                    op: OpSite::of(op),
                    input_index: alias.input,
                    input_count: call.inputs.len(),
                    span: op.span,
                });
            };
            self.donate(op, alias.input, v)?;
        }

        for (idx, &v) in call.inputs.iter().enumerate() {
            if call.is_aliased_input(idx) {
                continue;
            }
            self.ensure_not_donated(op, idx, v)?;
        }
        Ok(())
    }

    fn transfer_like(
        &mut self,
        op: &'f Operation,
        transfer: &TransferOp,
    ) -> Result<(), DonationError> {
        // Read-only transfers are still checked against earlier donations.
        for (idx, &v) in transfer.inputs.iter().enumerate() {
            self.ensure_not_donated(op, idx, v)?;
        }
        if !transfer.donated {
            return Ok(());
        }
        for (idx, &v) in transfer.inputs.iter().enumerate() {
            self.authorize(op, idx, v)?;
            // Earlier donors were rejected above, so an entry here was recorded by
            // this same op: repeating a value in one transfer is one donation.
            if self.ledger.is_donated(v) {
                continue;
            }
            self.ledger
                .record(v, op)
                .map_err(|first| self.double_donation(first, op, idx, v))?;
        }
        Ok(())
    }

    fn ret(&self, op: &'f Operation, ret: &ReturnOp) -> Result<(), DonationError> {
        for (idx, &v) in ret.operands.iter().enumerate() {
            if let Some(donor) = self.ledger.donor_of(v) {
                return Err(DonationError::ReturnOfDonatedValue {
                    function: self.func.name.clone(),
                    value: ValueRef::of(self.func, v),
                    result_index: idx,
                    ret: OpSite::of(op),
                    donor: OpSite::of(donor),
                    span: op.span,
                    donor_span: donor.span,
                });
            }
        }
        Ok(())
    }

    /// Ledger check, boundary check, then record.
    fn donate(&mut self, op: &'f Operation, idx: usize, v: ValueId) -> Result<(), DonationError> {
        self.ensure_not_donated(op, idx, v)?;
        self.authorize(op, idx, v)?;
        self.ledger
            .record(v, op)
            .map_err(|first| self.double_donation(first, op, idx, v))
    }

    fn ensure_not_donated(
        &self,
        op: &'f Operation,
        idx: usize,
        v: ValueId,
    ) -> Result<(), DonationError> {
        match self.ledger.donor_of(v) {
            Some(first) => Err(self.double_donation(first, op, idx, v)),
            None => Ok(()),
        }
    }

    fn authorize(&self, op: &Operation, idx: usize, v: ValueId) -> Result<(), DonationError> {
        self.boundary
            .check(v)
            .map_err(|unauthorized| DonationError::MissingDonationAttribute {
                function: self.func.name.clone(),
                value: ValueRef::of(self.func, v),
                input_index: idx,
                arg_position: unauthorized.position,
                op: OpSite::of(op),
                span: op.span,
                arg_span: unauthorized.span,
            })
    }

    fn double_donation(
        &self,
        first: &Operation,
        second: &Operation,
        idx: usize,
        v: ValueId,
    ) -> DonationError {
        DonationError::DoubleDonation {
            function: self.func.name.clone(),
            value: ValueRef::of(self.func, v),
            input_index: idx,
            first: OpSite::of(first),
            second: OpSite::of(second),
            span: second.span,
            first_span: first.span,
        }
    }
}
