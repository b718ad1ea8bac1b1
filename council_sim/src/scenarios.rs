//! Named parameter presets.

use council_core::CouncilParams;

/// Preset identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// Moderate conformity with a little noise
    Default,

    /// Full conformity, no noise: the whole council snaps to the verdict
    Snap,

    /// Zero conformity: members ignore the verdict and drift with noise
    Stubborn,

    /// Noise as wide as the opinion range
    Chaos,

    /// Half conformity with no noise: a deterministic map
    Quiet,
}

impl ScenarioId {
    /// Returns a list of all presets.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Default,
            ScenarioId::Snap,
            ScenarioId::Stubborn,
            ScenarioId::Chaos,
            ScenarioId::Quiet,
        ]
    }

    /// Returns the preset name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Default => "default",
            ScenarioId::Snap => "snap",
            ScenarioId::Stubborn => "stubborn",
            ScenarioId::Chaos => "chaos",
            ScenarioId::Quiet => "quiet",
        }
    }

    /// Returns a description of the preset.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Default => "10 members, alpha 0.5, noise 0.1, 30 steps",
            ScenarioId::Snap => "alpha 1.0, no noise: everyone jumps to the verdict",
            ScenarioId::Stubborn => "alpha 0.0: the verdict is ignored, noise only",
            ScenarioId::Chaos => "alpha 0.5, noise 1.0: mood swings dominate",
            ScenarioId::Quiet => "alpha 0.5, no noise: deterministic drift",
        }
    }

    /// Returns the engine parameters for this preset.
    pub fn params(&self) -> CouncilParams {
        let base = CouncilParams::default();
        match self {
            ScenarioId::Default => base,
            ScenarioId::Snap => base.with_conformity(1.0).with_noise(0.0),
            ScenarioId::Stubborn => base.with_conformity(0.0),
            ScenarioId::Chaos => base.with_noise(1.0),
            ScenarioId::Quiet => base.with_noise(0.0),
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(ScenarioId::Default),
            "snap" => Ok(ScenarioId::Snap),
            "stubborn" => Ok(ScenarioId::Stubborn),
            "chaos" => Ok(ScenarioId::Chaos),
            "quiet" => Ok(ScenarioId::Quiet),
            _ => Err(format!("Unknown preset: {}", s)),
        }
    }
}
