//! # Non Central Chi Squared
//!
//! $$
//! X\sim\chi^2_\nu(\lambda),\quad X \overset{d}{=} 2\,\Gamma\!\left(\tfrac\nu2+N,\ 1\right),\quad N\sim\mathrm{Pois}(\lambda/2)
//! $$
//!
use rand::Rng;

use crate::traits::FloatExt;

/// Draws one noncentral chi-squared variate with `df` degrees of freedom
/// and noncentrality `lambda`, via the Poisson mixture of central
/// chi-squareds: `N ~ Poisson(lambda / 2)` followed by a chi-squared with
/// `df + 2N` degrees of freedom, i.e. `Gamma(df/2 + N, scale 2)`.
///
/// The mixture covers the degenerate cases in one code path: `lambda = 0`
/// skips the Poisson draw, and `df = 0` with no Poisson arrival is the
/// point mass at zero.
pub fn sample<T: FloatExt>(df: T, lambda: T, rng: &mut impl Rng) -> T {
  let half = T::from_f64_(0.5);
  let two = T::from_f64_(2.0);
  let count = T::poisson(rng, lambda * half);
  let shape = df * half + T::from_usize_(count as usize);
  T::gamma(rng, shape, two)
}
