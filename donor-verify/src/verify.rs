#![forbid(unsafe_code)]

use donor_ir::Function;

use crate::error::DonationError;
use crate::rules::RuleContext;

/// Checks the donation discipline of one function.
///
/// Functions carrying neither the program nor the reshard tag are accepted
/// without looking at their body. Otherwise the body is walked once in
/// program order against a fresh ledger and the first violation is returned;
/// nothing after it is visited.
///
/// The function is expected to be structurally valid (see
/// [`Function::validate`]); an `io_alias` naming a missing input is reported
/// as [`DonationError::MalformedIoAlias`] rather than panicking.
pub fn verify_function(func: &Function) -> Result<(), DonationError> {
    if !func.is_donation_checked() {
        tracing::debug!(function = %func.name, "skipping function without donation tags");
        return Ok(());
    }

    let mut rules = RuleContext::new(func);
    for op in &func.ops {
        if let Err(e) = rules.apply(op) {
            tracing::debug!(
                function = %func.name,
                op = op.id.0,
                kind = %e.kind(),
                "donation check failed"
            );
            return Err(e);
        }
    }

    tracing::debug!(
        function = %func.name,
        ops = func.ops.len(),
        donated = rules.ledger().len(),
        "donation check passed"
    );
    Ok(())
}
