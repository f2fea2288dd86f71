//! # Errors
//!
//! $$
//! \text{fail fast: no variate is drawn after a contract violation}
//! $$
//!
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SamplingError>;

/// Contract violations surfaced by model construction and sampling calls.
///
/// Both variants are detected eagerly, before any randomness is consumed,
/// and never alongside a partial result. Numeric degeneracies (near-zero
/// step sizes, cancellation in the transition constants) are recovered
/// internally by the documented limiting formulas and have no variant here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
  /// Malformed or out-of-range model coefficient.
  #[error("invalid parameter `{name}` = {value}: {constraint}")]
  InvalidParameter {
    name: &'static str,
    value: f64,
    constraint: &'static str,
  },

  /// Malformed call-site argument.
  #[error("invalid argument `{argument}`: {reason}")]
  InvalidArgument {
    argument: &'static str,
    reason: String,
  },
}

impl SamplingError {
  pub(crate) fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
    Self::InvalidArgument {
      argument,
      reason: reason.into(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_names_the_offender() {
    let err = SamplingError::InvalidParameter {
      name: "sigma",
      value: -0.1,
      constraint: "must be strictly positive",
    };
    let msg = err.to_string();
    assert!(msg.contains("sigma"));
    assert!(msg.contains("-0.1"));
    assert!(msg.contains("strictly positive"));
  }
}
