//! Run parameters and their validation.

use crate::error::{CouncilError, Result};
use serde::{Deserialize, Serialize};

/// Parameters for a single council run.
///
/// Immutable for the duration of a run. Changing any of them means building a
/// fresh session (see [`crate::CouncilSession::reinitialize`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouncilParams {
    /// Number of council members (>= 1)
    pub member_count: usize,

    /// Conformity α in [0, 1]: weight given to the system's verdict
    pub conformity: f64,

    /// Half-width of the uniform per-member noise, in [0, 1]
    pub noise: f64,

    /// Number of steps in the run (>= 1)
    pub step_count: usize,
}

impl Default for CouncilParams {
    fn default() -> Self {
        Self {
            member_count: 10,
            conformity: 0.5,
            noise: 0.1,
            step_count: 30,
        }
    }
}

impl CouncilParams {
    /// Creates a parameter set. Call [`validate`](Self::validate) before use.
    pub fn new(member_count: usize, conformity: f64, noise: f64, step_count: usize) -> Self {
        Self {
            member_count,
            conformity,
            noise,
            step_count,
        }
    }

    /// Returns a copy with a different member count.
    pub fn with_members(mut self, member_count: usize) -> Self {
        self.member_count = member_count;
        self
    }

    /// Returns a copy with a different conformity.
    pub fn with_conformity(mut self, conformity: f64) -> Self {
        self.conformity = conformity;
        self
    }

    /// Returns a copy with a different noise level.
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    /// Returns a copy with a different step count.
    pub fn with_steps(mut self, step_count: usize) -> Self {
        self.step_count = step_count;
        self
    }

    /// Checks every field against its documented range.
    ///
    /// Non-finite reals are rejected here rather than clamped. The history
    /// grid must also be addressable: `member_count * step_count` f64 cells
    /// may not exceed `isize::MAX` bytes.
    pub fn validate(&self) -> Result<()> {
        if self.member_count == 0 {
            return Err(CouncilError::config("member_count must be at least 1"));
        }
        if self.step_count == 0 {
            return Err(CouncilError::config("step_count must be at least 1"));
        }
        check_unit("conformity", self.conformity)?;
        check_unit("noise", self.noise)?;
        let grid_bytes = self
            .member_count
            .checked_mul(self.step_count)
            .and_then(|cells| cells.checked_mul(std::mem::size_of::<f64>()));
        match grid_bytes {
            Some(bytes) if bytes <= isize::MAX as usize => Ok(()),
            _ => Err(CouncilError::config(format!(
                "history of {} x {} cells does not fit in memory",
                self.step_count, self.member_count
            ))),
        }
    }
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(CouncilError::config(format!("{name} must be finite, got {value}")));
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(CouncilError::config(format!("{name} must lie in [0, 1], got {value}")));
    }
    Ok(())
}
