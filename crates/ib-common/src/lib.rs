//! Infra-Bayes shared error types.
//!
//! Every fallible operation in the workspace returns [`Result`], so shape
//! failures from `ib-math` and validation failures from `ib-config` convert
//! into one [`Error`] with `?`.

pub mod error;

pub use error::{format_error_human, Error, ErrorCategory, Result, StructuredError, SuggestedAction};
