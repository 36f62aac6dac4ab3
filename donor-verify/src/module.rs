#![forbid(unsafe_code)]

use donor_ir::{Function, Module};
use rayon::prelude::*;

use crate::config::VerifyConfig;
use crate::error::DonationError;
use crate::verify::verify_function;

#[derive(Debug)]
pub struct FunctionFailure {
    /// Position of the function in the module.
    pub index: usize,
    pub error: DonationError,
}

/// Module-level result. Failures are in module order whether or not the
/// functions were verified in parallel.
#[derive(Debug, Default)]
pub struct VerifyReport {
    pub functions: usize,
    /// Tagged functions whose body was walked.
    pub checked: usize,
    /// Untagged functions accepted without a walk.
    pub skipped: usize,
    pub failures: Vec<FunctionFailure>,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Functions not reached because the failure limit was hit first.
    pub fn unreached(&self) -> usize {
        self.functions - self.checked - self.skipped
    }

    pub fn into_result(self) -> Result<(), DonationError> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure.error),
            None => Ok(()),
        }
    }
}

enum Outcome {
    Skipped,
    Passed,
    Failed(DonationError),
}

fn outcome(func: &Function) -> Outcome {
    if !func.is_donation_checked() {
        return Outcome::Skipped;
    }
    match verify_function(func) {
        Ok(()) => Outcome::Passed,
        Err(e) => Outcome::Failed(e),
    }
}

/// Verifies every function of `module`. Each function gets its own ledger,
/// so functions are independent and may run on the rayon pool.
pub fn verify_module(module: &Module, cfg: &VerifyConfig) -> VerifyReport {
    let limit = cfg.failure_limit();

    let outcomes: Vec<Outcome> = if cfg.parallel {
        module.functions.par_iter().map(outcome).collect()
    } else {
        let mut outcomes = Vec::with_capacity(module.functions.len());
        let mut failed = 0;
        for func in &module.functions {
            let o = outcome(func);
            let stop = matches!(o, Outcome::Failed(_)) && {
                failed += 1;
                failed >= limit
            };
            outcomes.push(o);
            if stop {
                break;
            }
        }
        outcomes
    };

    let mut report = VerifyReport {
        functions: module.functions.len(),
        ..VerifyReport::default()
    };
    for (index, o) in outcomes.into_iter().enumerate() {
        match o {
            Outcome::Skipped => report.skipped += 1,
            Outcome::Passed => report.checked += 1,
            Outcome::Failed(error) => {
                tracing::warn!(function = %error.function(), kind = %error.kind(), "{error}");
                report.checked += 1;
                report.failures.push(FunctionFailure { index, error });
                if report.failures.len() >= limit {
                    break;
                }
            }
        }
    }

    tracing::info!(
        module = %module.name,
        checked = report.checked,
        skipped = report.skipped,
        failed = report.failures.len(),
        "donation verification finished"
    );
    report
}
