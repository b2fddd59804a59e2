use crate::error::SummitError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Recognized optimizer variants.
///
/// The variant is given as a tag in the configuration and resolved once,
/// when an [`Experiment`](crate::Experiment) is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    /// Proximal policy optimization.
    Ppo,

    /// Advantage actor-critic.
    A2c,
}

impl OptimizerKind {
    /// The canonical tag of the variant.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Ppo => "ppo",
            Self::A2c => "a2c",
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for OptimizerKind {
    type Err = SummitError;

    /// Tags are case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ppo" => Ok(Self::Ppo),
            "a2c" => Ok(Self::A2c),
            _ => Err(SummitError::Configuration(format!(
                "Unknown model name {}, please choose either 'ppo' or 'a2c'",
                s
            ))),
        }
    }
}
