//! # Traits
//!
//! $$
//! T\in\{\texttt{f32},\texttt{f64}\},\quad X\sim\mathcal{N},\ \Gamma,\ \mathrm{Pois}
//! $$
//!
use std::fmt::Debug;
use std::fmt::Display;
use std::iter::Sum;

use ndarray::ScalarOperand;
use rand::Rng;
use rand_distr::Distribution;
use rand_distr::Gamma;
use rand_distr::Poisson;
use rand_distr::StandardNormal;

/// Working precision of a model and of every array it produces.
///
/// The precision is carried as a type parameter: `CirModel<f32>` is the
/// single precision model, `CirModel<f64>` the double precision one. The
/// sampling hooks are provided per impl so generic code never carries
/// `rand_distr` bounds of its own.
pub trait FloatExt:
  num_traits::Float
  + num_traits::FromPrimitive
  + num_traits::ToPrimitive
  + Sum
  + Default
  + Debug
  + Display
  + Send
  + Sync
  + ScalarOperand
  + 'static
{
  fn from_usize_(n: usize) -> Self;

  fn from_f64_(x: f64) -> Self;

  /// Draw from the standard normal distribution.
  fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> Self;

  /// Draw from `Gamma(shape, scale)`. `shape == 0` is the point mass at
  /// zero, which a gamma sampler cannot represent itself.
  fn gamma<R: Rng + ?Sized>(rng: &mut R, shape: Self, scale: Self) -> Self;

  /// Draw a Poisson count with the given mean. `mean == 0` is the point
  /// mass at zero.
  fn poisson<R: Rng + ?Sized>(rng: &mut R, mean: Self) -> u64;
}

/// `rand_distr`-style adapter over the [`FloatExt`] normal hook, so batch
/// fills can go through `ndarray_rand::RandomExt` at any precision.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardNormalExt;

impl<T: FloatExt> Distribution<T> for StandardNormalExt {
  fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
    T::standard_normal(rng)
  }
}

impl FloatExt for f64 {
  fn from_usize_(n: usize) -> Self {
    n as f64
  }

  fn from_f64_(x: f64) -> Self {
    x
  }

  fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> Self {
    StandardNormal.sample(rng)
  }

  fn gamma<R: Rng + ?Sized>(rng: &mut R, shape: Self, scale: Self) -> Self {
    if shape <= 0.0 {
      return 0.0;
    }
    Gamma::new(shape, scale)
      .expect("shape and scale are positive")
      .sample(rng)
  }

  fn poisson<R: Rng + ?Sized>(rng: &mut R, mean: Self) -> u64 {
    if mean <= 0.0 {
      return 0;
    }
    Poisson::new(mean)
      .expect("mean is positive and finite")
      .sample(rng) as u64
  }
}

impl FloatExt for f32 {
  fn from_usize_(n: usize) -> Self {
    n as f32
  }

  fn from_f64_(x: f64) -> Self {
    x as f32
  }

  fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> Self {
    StandardNormal.sample(rng)
  }

  fn gamma<R: Rng + ?Sized>(rng: &mut R, shape: Self, scale: Self) -> Self {
    if shape <= 0.0 {
      return 0.0;
    }
    Gamma::new(shape, scale)
      .expect("shape and scale are positive")
      .sample(rng)
  }

  fn poisson<R: Rng + ?Sized>(rng: &mut R, mean: Self) -> u64 {
    // Poisson counts are drawn in f64; single precision loses integer
    // resolution long before the means this sampler produces.
    f64::poisson(rng, mean as f64)
  }
}

#[cfg(test)]
mod tests {
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  use super::*;

  #[test]
  fn gamma_zero_shape_is_point_mass() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..100 {
      assert_eq!(f64::gamma(&mut rng, 0.0, 2.0), 0.0);
    }
  }

  #[test]
  fn poisson_zero_mean_is_point_mass() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..100 {
      assert_eq!(f64::poisson(&mut rng, 0.0), 0);
    }
  }

  #[test]
  fn poisson_mean_matches() {
    let mut rng = StdRng::seed_from_u64(42);
    let n = 20_000;
    let mean = 7.5;
    let total: u64 = (0..n).map(|_| f64::poisson(&mut rng, mean)).sum();
    let sample_mean = total as f64 / n as f64;
    assert!((sample_mean - mean).abs() < 0.1);
  }

  #[test]
  fn gamma_mean_matches() {
    let mut rng = StdRng::seed_from_u64(42);
    let n = 20_000;
    let (shape, scale) = (4.0, 2.0);
    let total: f64 = (0..n).map(|_| f64::gamma(&mut rng, shape, scale)).sum();
    let sample_mean = total / n as f64;
    assert!((sample_mean - shape * scale).abs() < 0.2);
  }
}
