#![forbid(unsafe_code)]

use std::fmt;

use donor_ir::{Function, OpId, Operation, Span, ValueId};
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// An operation referenced by a diagnostic: `` `call @f` (op #3) ``.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpSite {
    pub id: OpId,
    pub name: String,
    pub span: Span,
}

impl OpSite {
    pub fn of(op: &Operation) -> Self {
        let name = match &op.kind {
            donor_ir::OpKind::CallLike(call) => format!("{} @{}", op.name(), call.callee),
            _ => op.name().to_string(),
        };
        Self {
            id: op.id,
            name,
            span: op.span,
        }
    }
}

impl fmt::Display for OpSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` (op #{})", self.name, self.id.0)
    }
}

/// The value a diagnostic is about, with its printable name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueRef {
    pub id: ValueId,
    pub name: String,
}

impl ValueRef {
    pub fn of(func: &Function, id: ValueId) -> Self {
        Self {
            id,
            name: func.value_name(id),
        }
    }
}

impl fmt::Display for ValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DonationErrorKind {
    DoubleDonation,
    MissingDonationAttribute,
    ReturnOfDonatedValue,
    MalformedIoAlias,
}

impl fmt::Display for DonationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DonationErrorKind::DoubleDonation => "double-donation",
            DonationErrorKind::MissingDonationAttribute => "missing-donation-attribute",
            DonationErrorKind::ReturnOfDonatedValue => "return-of-donated-value",
            DonationErrorKind::MalformedIoAlias => "malformed-io-alias",
        })
    }
}

/// First donation violation found in a function.
#[derive(Clone, Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum DonationError {
    #[error("input #{input_index} ({value}) of {second} in @{function} was already donated to {first}")]
    #[diagnostic(
        code(donor::double_donation),
        help("a donated array may not be read or donated again")
    )]
    DoubleDonation {
        function: String,
        value: ValueRef,
        input_index: usize,
        first: OpSite,
        second: OpSite,
        #[label("used again here")]
        span: Span,
        #[label("first donated here")]
        first_span: Span,
    },

    #[error("input #{input_index} ({value}) of {op} in @{function} has not been donated to the program")]
    #[diagnostic(
        code(donor::missing_donation_attribute),
        help("mark argument #{arg_position} of @{function} as donated")
    )]
    MissingDonationAttribute {
        function: String,
        value: ValueRef,
        input_index: usize,
        arg_position: usize,
        op: OpSite,
        #[label("donated here")]
        span: Span,
        #[label("argument is not donated")]
        arg_span: Span,
    },

    #[error("result #{result_index} ({value}) of @{function} was already donated to {donor}")]
    #[diagnostic(code(donor::return_of_donated_value))]
    ReturnOfDonatedValue {
        function: String,
        value: ValueRef,
        result_index: usize,
        ret: OpSite,
        donor: OpSite,
        #[label("returned here")]
        span: Span,
        #[label("donated here")]
        donor_span: Span,
    },

    #[error("io_alias of {op} in @{function} names input #{input_index}, but the op has {input_count} inputs")]
    #[diagnostic(code(donor::malformed_io_alias))]
    MalformedIoAlias {
        function: String,
        op: OpSite,
        input_index: usize,
        input_count: usize,
        #[label]
        span: Span,
    },
}

impl DonationError {
    pub fn kind(&self) -> DonationErrorKind {
        match self {
            DonationError::DoubleDonation { .. } => DonationErrorKind::DoubleDonation,
            DonationError::MissingDonationAttribute { .. } => {
                DonationErrorKind::MissingDonationAttribute
            }
            DonationError::ReturnOfDonatedValue { .. } => DonationErrorKind::ReturnOfDonatedValue,
            DonationError::MalformedIoAlias { .. } => DonationErrorKind::MalformedIoAlias,
        }
    }

    pub fn function(&self) -> &str {
        match self {
            DonationError::DoubleDonation { function, .. }
            | DonationError::MissingDonationAttribute { function, .. }
            | DonationError::ReturnOfDonatedValue { function, .. }
            | DonationError::MalformedIoAlias { function, .. } => function,
        }
    }

    /// The value the violation is about, when there is one.
    pub fn value(&self) -> Option<ValueId> {
        match self {
            DonationError::DoubleDonation { value, .. }
            | DonationError::MissingDonationAttribute { value, .. }
            | DonationError::ReturnOfDonatedValue { value, .. } => Some(value.id),
            DonationError::MalformedIoAlias { .. } => None,
        }
    }

    /// The operation at which the walk stopped.
    pub fn violating_op(&self) -> OpId {
        match self {
            DonationError::DoubleDonation { second, .. } => second.id,
            DonationError::MissingDonationAttribute { op, .. }
            | DonationError::MalformedIoAlias { op, .. } => op.id,
            DonationError::ReturnOfDonatedValue { ret, .. } => ret.id,
        }
    }

    /// The operation that donated the value first, for double donation and
    /// return-after-donation.
    pub fn origin(&self) -> Option<&OpSite> {
        match self {
            DonationError::DoubleDonation { first, .. } => Some(first),
            DonationError::ReturnOfDonatedValue { donor, .. } => Some(donor),
            _ => None,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            DonationError::DoubleDonation { span, .. }
            | DonationError::MissingDonationAttribute { span, .. }
            | DonationError::ReturnOfDonatedValue { span, .. }
            | DonationError::MalformedIoAlias { span, .. } => *span,
        }
    }
}
