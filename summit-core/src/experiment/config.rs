//! Configuration of [`Experiment`](super::Experiment).
use super::OptimizerKind;
use crate::{env::PeakEnvConfig, error::SummitError, Vec2};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Experiment`](super::Experiment).
///
/// Created once before the experiment starts and never mutated afterwards.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Tag of the optimizer variant, `"ppo"` or `"a2c"`.
    pub model: String,

    /// The number of environment interactions for training.
    pub max_timesteps: usize,

    /// State of the environment at construction.
    pub initial_state: Vec2,

    /// Where the trained policy is saved.
    pub model_path: String,

    /// Random seed given to the environment and the agent.
    pub seed: Option<u64>,

    /// If `true`, a non-finite state after training or evaluation aborts the run.
    pub check_finite: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            model: "ppo".to_string(),
            max_timesteps: 100_000,
            initial_state: Vec2::zeros(),
            model_path: "agent_model".to_string(),
            seed: None,
            check_finite: false,
        }
    }
}

impl ExperimentConfig {
    /// Sets the tag of the optimizer variant.
    pub fn model(mut self, v: impl Into<String>) -> Self {
        self.model = v.into();
        self
    }

    /// Sets the number of environment interactions for training.
    pub fn max_timesteps(mut self, v: usize) -> Self {
        self.max_timesteps = v;
        self
    }

    /// Sets the initial state of the environment.
    pub fn initial_state(mut self, v: Vec2) -> Self {
        self.initial_state = v;
        self
    }

    /// Sets the destination of the trained policy.
    pub fn model_path(mut self, v: impl Into<String>) -> Self {
        self.model_path = v.into();
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = Some(v);
        self
    }

    /// Enables or disables finiteness checks of the state.
    pub fn check_finite(mut self, v: bool) -> Self {
        self.check_finite = v;
        self
    }

    /// Resolves the optimizer variant tag.
    pub fn optimizer_kind(&self) -> Result<OptimizerKind, SummitError> {
        self.model.parse()
    }

    /// Checks the configuration and returns the optimizer variant.
    pub fn validate(&self) -> Result<OptimizerKind, SummitError> {
        let kind = self.optimizer_kind()?;
        if self.max_timesteps == 0 {
            return Err(SummitError::Configuration(
                "max_timesteps must be positive".to_string(),
            ));
        }
        Ok(kind)
    }

    /// Configuration of the environment.
    pub fn env_config(&self) -> PeakEnvConfig {
        PeakEnvConfig::default().initial_state(self.initial_state)
    }

    /// Constructs [`ExperimentConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ExperimentConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_experiment_config() -> Result<()> {
        let config = ExperimentConfig::default()
            .model("a2c")
            .max_timesteps(500)
            .initial_state(Vec2::new(0.5, 0.25))
            .model_path("some/directory")
            .seed(42);

        let dir = TempDir::new("experiment_config")?;
        let path = dir.path().join("experiment.yaml");
        config.save(&path)?;
        let config_ = ExperimentConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_missing_fields_take_defaults() -> Result<()> {
        let config: ExperimentConfig = serde_yaml::from_str("model: a2c\nmax_timesteps: 10\n")?;
        assert_eq!(config.model, "a2c");
        assert_eq!(config.max_timesteps, 10);
        assert_eq!(config.model_path, "agent_model");
        assert_eq!(config.initial_state, Vec2::zeros());
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert_eq!(ExperimentConfig::default().validate(), Ok(OptimizerKind::Ppo));
        assert!(matches!(
            ExperimentConfig::default().model("ddpg").validate(),
            Err(SummitError::Configuration(_))
        ));
        assert!(matches!(
            ExperimentConfig::default().max_timesteps(0).validate(),
            Err(SummitError::Configuration(_))
        ));
    }
}
