//! # Random engines
//!
//! $$
//! \texttt{Stateless}:\ (\text{seed},\ \text{step},\ \text{path})\mapsto\text{stream},\qquad
//! \texttt{Pseudo}:\ \text{one engine per call}
//! $$
//!
use rand::rngs::StdRng;
use rand::RngCore;
use rand::SeedableRng;

use crate::error::Result;
use crate::error::SamplingError;

/// Randomness mode of a sampling call.
///
/// `Halton` and `Sobol` tag the quasi-random sequences of the wider
/// toolkit; the CIR samplers accept only `Pseudo` and `Stateless` and
/// reject the rest before any computation proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomType {
  /// Stateful engine seeded once per call. The same seed replays the same
  /// call, but draws depend on invocation order.
  Pseudo,
  /// Pure function of `(seed, step index, path index)`, independent of
  /// execution order and of parallelism. The seed is mandatory.
  Stateless,
  /// Halton low-discrepancy sequence.
  Halton,
  /// Sobol low-discrepancy sequence.
  Sobol,
}

/// Resolved determinism mode: the mode/seed pair after call-site
/// validation, so downstream code cannot observe a missing stateless seed
/// or an unsupported mode.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Randomness {
  Pseudo(Option<u64>),
  Stateless(u64),
}

impl Randomness {
  /// Validates the mode/seed pair. Runs before anything draws a variate.
  pub(crate) fn resolve(random_type: RandomType, seed: Option<u64>) -> Result<Self> {
    match random_type {
      RandomType::Pseudo => Ok(Self::Pseudo(seed)),
      RandomType::Stateless => match seed {
        Some(seed) => Ok(Self::Stateless(seed)),
        None => Err(SamplingError::invalid_argument(
          "seed",
          "a seed is mandatory under stateless determinism",
        )),
      },
      other => Err(SamplingError::invalid_argument(
        "random_type",
        format!("{other:?} is not supported; use Pseudo or Stateless"),
      )),
    }
  }
}

/// Per-call stateful engine for `Pseudo` mode. Entropy-seeded when the
/// caller leaves the seed unspecified.
pub(crate) fn pseudo_rng(seed: Option<u64>) -> StdRng {
  match seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_entropy(),
  }
}

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

#[inline]
fn mix64(mut z: u64) -> u64 {
  z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
  z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
  z ^ (z >> 31)
}

/// Counter-based splitmix64 stream keyed by `(seed, step, path)`.
///
/// Every key owns an independent stream, so batched draws never share
/// engine state and a whole path batch is a pure function of the seed.
/// Rejection samplers consume a variable number of words per draw; that is
/// harmless because the stream, not the word position, is the unit of
/// reproducibility.
#[derive(Debug, Clone)]
pub struct StatelessRng {
  state: u64,
}

impl StatelessRng {
  pub fn new(seed: u64, step: u64, path: u64) -> Self {
    let mut state = mix64(seed ^ GOLDEN_GAMMA);
    state = mix64(state ^ step.wrapping_mul(0xd134_2543_de82_ef95));
    state = mix64(state ^ path.wrapping_mul(0x2545_f491_4f6c_dd1d));
    Self { state }
  }
}

impl RngCore for StatelessRng {
  fn next_u32(&mut self) -> u32 {
    (self.next_u64() >> 32) as u32
  }

  fn next_u64(&mut self) -> u64 {
    self.state = self.state.wrapping_add(GOLDEN_GAMMA);
    mix64(self.state)
  }

  fn fill_bytes(&mut self, dest: &mut [u8]) {
    let mut chunks = dest.chunks_exact_mut(8);
    for chunk in &mut chunks {
      chunk.copy_from_slice(&self.next_u64().to_le_bytes());
    }
    let rem = chunks.into_remainder();
    if !rem.is_empty() {
      let bytes = self.next_u64().to_le_bytes();
      rem.copy_from_slice(&bytes[..rem.len()]);
    }
  }

  fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
    self.fill_bytes(dest);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use rand::Rng;

  use super::*;

  #[test]
  fn stateless_stream_replays() {
    let mut a = StatelessRng::new(42, 3, 17);
    let mut b = StatelessRng::new(42, 3, 17);
    for _ in 0..100 {
      assert_eq!(a.next_u64(), b.next_u64());
    }
  }

  #[test]
  fn stateless_key_components_all_matter() {
    let draw = |seed, step, path| {
      let mut rng = StatelessRng::new(seed, step, path);
      (0..8).map(|_| rng.next_u64()).collect::<Vec<_>>()
    };
    let reference = draw(42, 3, 17);
    assert_ne!(reference, draw(43, 3, 17));
    assert_ne!(reference, draw(42, 4, 17));
    assert_ne!(reference, draw(42, 3, 18));
  }

  #[test]
  fn stateless_uniforms_cover_unit_interval() {
    let mut rng = StatelessRng::new(7, 0, 0);
    let n = 10_000;
    let mean: f64 = (0..n).map(|_| rng.gen::<f64>()).sum::<f64>() / n as f64;
    assert!((mean - 0.5).abs() < 0.02);
  }

  #[test]
  fn pseudo_engine_replays_with_seed() {
    let mut a = pseudo_rng(Some(9));
    let mut b = pseudo_rng(Some(9));
    for _ in 0..100 {
      assert_eq!(a.next_u64(), b.next_u64());
    }
  }

  #[test]
  fn resolve_rejects_missing_stateless_seed() {
    let err = Randomness::resolve(RandomType::Stateless, None).unwrap_err();
    assert!(matches!(
      err,
      SamplingError::InvalidArgument { argument: "seed", .. }
    ));
  }

  #[test]
  fn resolve_rejects_quasi_random_modes() {
    for mode in [RandomType::Halton, RandomType::Sobol] {
      let err = Randomness::resolve(mode, Some(1)).unwrap_err();
      assert!(matches!(
        err,
        SamplingError::InvalidArgument {
          argument: "random_type",
          ..
        }
      ));
    }
  }
}
