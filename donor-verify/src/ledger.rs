#![forbid(unsafe_code)]

use std::collections::HashMap;

use donor_ir::{Operation, ValueId};

/// Which operation donated which value, for one verification run.
///
/// Keys are value handles, so two distinct values never collide even if
/// they are structurally identical. A value is recorded at most once.
#[derive(Debug, Default)]
pub struct DonationLedger<'f> {
    donated: HashMap<ValueId, &'f Operation>,
}

impl<'f> DonationLedger<'f> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn donor_of(&self, v: ValueId) -> Option<&'f Operation> {
        self.donated.get(&v).copied()
    }

    pub fn is_donated(&self, v: ValueId) -> bool {
        self.donated.contains_key(&v)
    }

    /// Records `v` as donated by `op`. If `v` was already donated the ledger
    /// is left unchanged and the earlier donor is returned.
    pub fn record(&mut self, v: ValueId, op: &'f Operation) -> Result<(), &'f Operation> {
        if let Some(first) = self.donor_of(v) {
            return Err(first);
        }
        tracing::trace!(value = v.0, op = op.id.0, "record donation");
        self.donated.insert(v, op);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.donated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.donated.is_empty()
    }
}
