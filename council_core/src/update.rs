//! The paradoxical update rule.
//!
//! One step of the council map:
//!
//! ```text
//! m         = mean(x)
//! R         = 1 if m < 0.5 else 0
//! x_i(t+1)  = clamp((1 - α) x_i(t) + α (1 - R) + ε_i),   ε_i ~ U(-noise, noise)
//! ```
//!
//! The feedback `R` is the system's inverted read of the majority. The
//! boundary `m == 0.5` always resolves to `R = 0`.

use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

/// Mean opinion at which the verdict flips.
pub const MAJORITY_THRESHOLD: f64 = 0.5;

/// The system's verdict `R`, derived from the previous mean opinion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feedback {
    /// `R = 0`: the council leaned yes (mean >= 0.5)
    Reject,
    /// `R = 1`: the council leaned no (mean < 0.5)
    Affirm,
}

impl Feedback {
    /// Computes the verdict for a mean opinion.
    pub fn from_mean(mean: f64) -> Self {
        if mean < MAJORITY_THRESHOLD {
            Feedback::Affirm
        } else {
            Feedback::Reject
        }
    }

    /// Returns `R` as a number (0.0 or 1.0).
    pub fn value(self) -> f64 {
        match self {
            Feedback::Affirm => 1.0,
            Feedback::Reject => 0.0,
        }
    }

    /// Returns the opinion members are pulled toward, `1 - R`.
    pub fn target(self) -> f64 {
        1.0 - self.value()
    }
}

/// Result of one application of the update rule.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutput {
    /// The clamped next state vector
    pub next: Vec<f64>,
    /// Verdict used to produce it
    pub feedback: Feedback,
}

/// Arithmetic mean of a slice. Empty slices average to 0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Truncates an opinion into [0, 1].
#[inline]
pub fn clamp_opinion(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Computes the verdict for the current state vector.
pub fn feedback(x: &[f64]) -> Feedback {
    Feedback::from_mean(mean(x))
}

/// Applies one step to `x` and returns the next state, leaving `x` untouched.
pub fn step<R: Rng + ?Sized>(x: &[f64], conformity: f64, noise: f64, rng: &mut R) -> StepOutput {
    let mut next = x.to_vec();
    let feedback = step_in_place(&mut next, conformity, noise, rng);
    StepOutput { next, feedback }
}

/// Applies one step to `x` in place and returns the verdict that drove it.
///
/// Draws exactly one noise sample per member when `noise > 0` and none
/// otherwise.
pub fn step_in_place<R: Rng + ?Sized>(
    x: &mut [f64],
    conformity: f64,
    noise: f64,
    rng: &mut R,
) -> Feedback {
    let verdict = feedback(x);
    let pull = conformity * verdict.target();
    let keep = 1.0 - conformity;
    let jitter = NoiseSampler::new(noise);

    for opinion in x.iter_mut() {
        let eps = jitter.sample(rng);
        *opinion = clamp_opinion(keep * *opinion + pull + eps);
    }

    verdict
}

/// Uniform `(-noise, noise)` sampler that is a constant zero for `noise == 0`.
#[derive(Debug, Clone, Copy)]
struct NoiseSampler {
    dist: Option<Uniform<f64>>,
}

impl NoiseSampler {
    fn new(noise: f64) -> Self {
        let dist = (noise > 0.0).then(|| Uniform::new(-noise, noise));
        Self { dist }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self.dist {
            Some(dist) => dist.sample(rng),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_tie_break_at_half() {
        // mean is exactly 0.5
        let x = [0.25, 0.75];
        assert_eq!(mean(&x), 0.5);
        assert_eq!(feedback(&x), Feedback::Reject);
        assert_eq!(feedback(&x).value(), 0.0);
    }

    #[test]
    fn test_feedback_inverts_majority() {
        assert_eq!(Feedback::from_mean(0.49), Feedback::Affirm);
        assert_eq!(Feedback::from_mean(0.51), Feedback::Reject);
        assert_eq!(Feedback::Affirm.target(), 0.0);
        assert_eq!(Feedback::Reject.target(), 1.0);
    }

    #[test]
    fn test_full_conformity_snaps_to_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let low = [0.1, 0.2, 0.3];
        let out = step(&low, 1.0, 0.0, &mut rng);
        assert_eq!(out.feedback, Feedback::Affirm);
        assert!(out.next.iter().all(|&v| v == 0.0));

        let high = [0.9, 0.8, 0.7];
        let out = step(&high, 1.0, 0.0, &mut rng);
        assert_eq!(out.feedback, Feedback::Reject);
        assert!(out.next.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_zero_conformity_ignores_feedback() {
        // Same RNG stream for a low-mean and a high-mean population:
        // the noise samples must line up and R must have no effect.
        let low = [0.1, 0.2, 0.3, 0.4];
        let high = [0.6, 0.7, 0.8, 0.9];

        let mut rng_a = ChaCha8Rng::seed_from_u64(7);
        let mut rng_b = ChaCha8Rng::seed_from_u64(7);
        let out_low = step(&low, 0.0, 0.05, &mut rng_a);
        let out_high = step(&high, 0.0, 0.05, &mut rng_b);
        assert_ne!(out_low.feedback, out_high.feedback);

        for i in 0..low.len() {
            let eps_low = out_low.next[i] - low[i];
            let eps_high = out_high.next[i] - high[i];
            assert_relative_eq!(eps_low, eps_high, epsilon = 1e-12);
            assert!(eps_low.abs() <= 0.05);
        }
    }

    #[test]
    fn test_zero_conformity_clamps_drift() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let x = [0.0, 1.0, 0.0, 1.0];
        let out = step(&x, 0.0, 1.0, &mut rng);
        assert!(out.next.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_zero_noise_is_deterministic_and_draws_nothing() {
        let x = [0.25, 0.5, 0.75];
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut untouched = ChaCha8Rng::seed_from_u64(11);

        let out = step(&x, 0.5, 0.0, &mut rng);
        // mean = 0.5 -> R = 0 -> pull toward 1
        assert_eq!(out.feedback, Feedback::Reject);
        assert_relative_eq!(out.next[0], 0.625);
        assert_relative_eq!(out.next[1], 0.75);
        assert_relative_eq!(out.next[2], 0.875);

        assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
    }

    #[test]
    fn test_step_does_not_mutate_input() {
        let x = vec![0.3, 0.6];
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let _ = step(&x, 0.7, 0.2, &mut rng);
        assert_eq!(x, vec![0.3, 0.6]);
    }

    #[test]
    fn test_mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    proptest! {
        #[test]
        fn prop_next_state_stays_in_unit_interval(
            x in prop::collection::vec(0.0f64..=1.0, 1..64),
            conformity in 0.0f64..=1.0,
            noise in 0.0f64..=1.0,
            seed in any::<u64>(),
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let out = step(&x, conformity, noise, &mut rng);
            prop_assert_eq!(out.next.len(), x.len());
            for v in out.next {
                prop_assert!((0.0..=1.0).contains(&v));
            }
        }

        #[test]
        fn prop_snap_without_noise(
            x in prop::collection::vec(0.0f64..=1.0, 1..64),
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(0);
            let r = feedback(&x).value();
            let out = step(&x, 1.0, 0.0, &mut rng);
            for v in out.next {
                prop_assert_eq!(v, 1.0 - r);
            }
        }
    }
}
