//! # Euler-Maruyama reference sampler
//!
//! $$
//! X_{t+h}=X_t+a(t,X_t)\,h+b(t,X_t)\,\sqrt{h}\,Z,\quad Z\sim\mathcal{N}(0,1)
//! $$
//!
//! Time-discretized sampler over the same `(t, x)` coefficient signatures
//! as [`crate::model::CirModel::drift`] and
//! [`crate::model::CirModel::volatility`]. It carries the discretization
//! bias the exact sampler exists to avoid and is kept as an independent
//! cross-check; the exact sampler never calls it.
use ndarray::s;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::Array3;
use ndarray::Axis;
use ndarray_rand::RandomExt;
use tracing::debug;

use crate::error::Result;
use crate::error::SamplingError;
use crate::exact::resolve_initial_state;
use crate::exact::validate_num_samples;
use crate::exact::validate_times;
use crate::exact::InitialState;
use crate::rng::pseudo_rng;
use crate::rng::RandomType;
use crate::rng::Randomness;
use crate::rng::StatelessRng;
use crate::traits::FloatExt;
use crate::traits::StandardNormalExt;

/// Draws `num_samples` Euler-Maruyama paths observed at `times`, refining
/// each observation interval so no internal step exceeds `time_step`.
/// Output shape is `[num_samples, times.len(), 1]`, matching the exact
/// sampler.
#[allow(clippy::too_many_arguments)]
pub fn sample<T, F, G>(
  drift_fn: F,
  volatility_fn: G,
  times: &[T],
  time_step: T,
  num_samples: usize,
  initial_state: Option<InitialState<T>>,
  random_type: RandomType,
  seed: Option<u64>,
) -> Result<Array3<T>>
where
  T: FloatExt,
  F: Fn(T, &Array2<T>) -> Array2<T>,
  G: Fn(T, &Array2<T>) -> Array3<T>,
{
  let randomness = Randomness::resolve(random_type, seed)?;
  validate_num_samples(num_samples)?;
  validate_times(times)?;
  if !(time_step > T::zero()) || !time_step.is_finite() {
    return Err(SamplingError::invalid_argument(
      "time_step",
      "must be strictly positive and finite",
    ));
  }
  let mut state: Array2<T> =
    resolve_initial_state(initial_state, num_samples)?.insert_axis(Axis(1));

  debug!(
    num_samples,
    num_times = times.len(),
    ?random_type,
    "sampling Euler-Maruyama paths"
  );

  let mut paths = Array3::<T>::zeros((num_samples, times.len(), 1));
  let mut pseudo = match randomness {
    Randomness::Pseudo(seed) => Some(pseudo_rng(seed)),
    Randomness::Stateless(_) => None,
  };
  let mut prev = T::zero();
  // global substep counter: the stateless stream key must not repeat
  // across observation intervals
  let mut substep: u64 = 0;
  for (k, &t_obs) in times.iter().enumerate() {
    let dt = t_obs - prev;
    if dt > T::zero() {
      let n_sub = (dt / time_step).ceil().to_usize().unwrap_or(1).max(1);
      let h = dt / T::from_usize_(n_sub);
      let sqrt_h = h.sqrt();
      let mut t = prev;
      for _ in 0..n_sub {
        let z: Array1<T> = match (&mut pseudo, randomness) {
          (Some(rng), _) => Array1::random_using(num_samples, StandardNormalExt, rng),
          (None, Randomness::Stateless(seed)) => Array1::from_shape_fn(num_samples, |path| {
            T::standard_normal(&mut StatelessRng::new(seed, substep, path as u64))
          }),
          (None, Randomness::Pseudo(_)) => unreachable!("pseudo engine is always constructed"),
        };
        let drift = drift_fn(t, &state);
        let vol = volatility_fn(t, &state);
        for path in 0..num_samples {
          state[[path, 0]] = state[[path, 0]]
            + drift[[path, 0]] * h
            + vol[[path, 0, 0]] * sqrt_h * z[path];
        }
        t = t + h;
        substep += 1;
      }
    }
    prev = t_obs;
    paths
      .slice_mut(s![.., k, 0])
      .assign(&state.index_axis(Axis(1), 0));
  }
  Ok(paths)
}

#[cfg(test)]
mod tests {
  use ndarray::Array3;

  use super::*;
  use crate::model::CirModel;

  #[test]
  fn shape_matches_exact_sampler() {
    let model = CirModel::new(0.02, 0.5, 0.1).unwrap();
    let times = [0.25, 0.5, 0.75, 1.0];
    let samples = sample(
      |t, x| model.drift(t, x),
      |t, x| model.volatility(t, x),
      &times,
      0.05,
      32,
      None,
      RandomType::Stateless,
      Some(9),
    )
    .unwrap();
    assert_eq!(samples.shape(), &[32, 4, 1]);
  }

  #[test]
  fn zero_volatility_recovers_the_ode() {
    // with b = 0 the scheme integrates dx = (theta - kappa x) dt, whose
    // solution is theta/kappa + (x0 - theta/kappa) e^{-kappa t}
    let (theta, kappa, x0, t) = (0.02, 0.5, 1.0, 1.0);
    let samples = sample(
      |_t, x: &Array2<f64>| x.mapv(|v| theta - kappa * v),
      |_t, x: &Array2<f64>| Array3::zeros((x.nrows(), 1, 1)),
      &[t],
      0.001,
      4,
      Some(InitialState::Scalar(x0)),
      RandomType::Pseudo,
      Some(1),
    )
    .unwrap();
    let expected = theta / kappa + (x0 - theta / kappa) * (-kappa * t).exp();
    for path in 0..4 {
      assert!((samples[[path, 0, 0]] - expected).abs() < 1e-3);
    }
  }

  #[test]
  fn stateless_calls_are_bit_identical() {
    let model = CirModel::new(0.02, 0.5, 0.1).unwrap();
    let times = [0.5, 1.0];
    let run = |seed| {
      sample(
        |t, x| model.drift(t, x),
        |t, x| model.volatility(t, x),
        &times,
        0.1,
        16,
        None,
        RandomType::Stateless,
        Some(seed),
      )
      .unwrap()
    };
    assert_eq!(run(4), run(4));
    assert_ne!(run(4), run(5));
  }

  #[test]
  fn rejects_non_positive_time_step() {
    let model = CirModel::new(0.02, 0.5, 0.1).unwrap();
    for bad in [0.0, -0.1, f64::NAN] {
      let err = sample(
        |t, x| model.drift(t, x),
        |t, x| model.volatility(t, x),
        &[0.5],
        bad,
        8,
        None,
        RandomType::Pseudo,
        None,
      )
      .unwrap_err();
      assert!(matches!(err, SamplingError::InvalidArgument { .. }));
    }
  }
}
