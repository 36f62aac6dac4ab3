#![forbid(unsafe_code)]

//! Donation (linear ownership) verification for array programs.
//!
//! A value donated to a call through an `io_alias`, or to a donating
//! transfer, must not be read, donated again or returned afterwards, and a
//! donated function argument must carry the `donated` attribute.

pub mod boundary;
pub mod config;
pub mod error;
pub mod ledger;
pub mod module;
mod rules;
pub mod verify;

pub use boundary::{BoundaryChecker, Unauthorized};
pub use config::VerifyConfig;
pub use error::{DonationError, DonationErrorKind, OpSite, ValueRef};
pub use ledger::DonationLedger;
pub use module::{FunctionFailure, VerifyReport, verify_module};
pub use verify::verify_function;
