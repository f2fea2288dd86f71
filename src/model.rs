//! # CIR model
//!
//! $$
//! dX_t=(\theta-\kappa X_t)\,dt+\sigma\sqrt{X_t}\,dW_t
//! $$
//!
use ndarray::Array2;
use ndarray::Array3;
use ndarray::Axis;

use crate::error::Result;
use crate::error::SamplingError;
use crate::traits::FloatExt;

/// Cox-Ingersoll-Ross square-root diffusion.
///
/// `theta` is the long-run level numerator: the stationary mean of the
/// process is `theta / mean_reversion`. `mean_reversion = 0` is a valid
/// degenerate case in which the drift loses its pull-back term; the exact
/// transition constants then take their `kappa -> 0` limits.
///
/// The triple is immutable after construction and validated there, so
/// every downstream formula can assume `theta > 0`, `sigma > 0` and
/// `mean_reversion >= 0` without re-checking.
#[derive(Debug, Clone, PartialEq)]
pub struct CirModel<T: FloatExt> {
  theta: T,
  mean_reversion: T,
  sigma: T,
}

fn check<T: FloatExt>(name: &'static str, value: T, ok: bool, constraint: &'static str) -> Result<()> {
  if ok && value.is_finite() {
    return Ok(());
  }
  Err(SamplingError::InvalidParameter {
    name,
    value: value.to_f64().unwrap_or(f64::NAN),
    constraint,
  })
}

impl<T: FloatExt> CirModel<T> {
  pub fn new(theta: T, mean_reversion: T, sigma: T) -> Result<Self> {
    check("theta", theta, theta > T::zero(), "must be strictly positive")?;
    check(
      "mean_reversion",
      mean_reversion,
      mean_reversion >= T::zero(),
      "must be non-negative",
    )?;
    check("sigma", sigma, sigma > T::zero(), "must be strictly positive")?;
    Ok(Self {
      theta,
      mean_reversion,
      sigma,
    })
  }

  pub fn theta(&self) -> T {
    self.theta
  }

  pub fn mean_reversion(&self) -> T {
    self.mean_reversion
  }

  pub fn sigma(&self) -> T {
    self.sigma
  }

  /// Drift coefficient `theta - mean_reversion * x`, elementwise over a
  /// `[batch, 1]` state. Returns the same shape as `x`.
  pub fn drift(&self, _t: T, x: &Array2<T>) -> Array2<T> {
    x.mapv(|v| self.theta - self.mean_reversion * v)
  }

  /// Volatility coefficient `sigma * sqrt(max(x, 0))` with a trailing
  /// singleton axis for the single diffusion driver: shape `[batch, 1, 1]`.
  ///
  /// The samplers never emit negative states; the clamp guards against
  /// callers probing the coefficient outside the process support.
  pub fn volatility(&self, _t: T, x: &Array2<T>) -> Array3<T> {
    x.mapv(|v| self.sigma * v.max(T::zero()).sqrt())
      .insert_axis(Axis(2))
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use ndarray::arr2;

  use super::*;

  #[test]
  fn valid_parameters_are_accepted() {
    assert!(CirModel::new(0.04, 0.6, 0.1).is_ok());
    // zero mean reversion is the documented degenerate case
    assert!(CirModel::new(0.04, 0.0, 0.1).is_ok());
  }

  #[test]
  fn invalid_parameters_are_rejected() {
    for (theta, mean_reversion, sigma) in [
      (0.0, 0.6, 0.1),
      (-0.04, 0.6, 0.1),
      (0.04, -0.6, 0.1),
      (0.04, 0.6, 0.0),
      (0.04, 0.6, -0.1),
      (f64::NAN, 0.6, 0.1),
      (0.04, 0.6, f64::INFINITY),
    ] {
      let err = CirModel::new(theta, mean_reversion, sigma).unwrap_err();
      assert!(matches!(err, SamplingError::InvalidParameter { .. }));
    }
  }

  #[test]
  fn drift_matches_closed_form() {
    let model = CirModel::new(0.04, 0.6, 0.1).unwrap();
    let state = arr2(&[[1.0], [3.0], [5.0]]);
    let drift = model.drift(0.2, &state);
    assert_eq!(drift.shape(), &[3, 1]);
    for (d, x) in drift.iter().zip(state.iter()) {
      assert_relative_eq!(*d, 0.04 - 0.6 * x, epsilon = 1e-12);
    }
  }

  #[test]
  fn volatility_matches_closed_form_with_driver_axis() {
    let model = CirModel::new(0.04, 0.6, 0.1).unwrap();
    let state = arr2(&[[1.0f64], [3.0], [5.0]]);
    let vol = model.volatility(0.2, &state);
    assert_eq!(vol.shape(), &[3, 1, 1]);
    for (v, x) in vol.iter().zip(state.iter()) {
      assert_relative_eq!(*v, 0.1 * x.sqrt(), epsilon = 1e-12);
    }
  }

  #[test]
  fn volatility_clamps_negative_states() {
    let model = CirModel::new(0.04, 0.6, 0.1).unwrap();
    let vol = model.volatility(0.0, &arr2(&[[-1.0]]));
    assert_eq!(vol[[0, 0, 0]], 0.0);
  }
}
