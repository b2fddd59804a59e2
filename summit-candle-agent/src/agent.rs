//! Closed set of the agents selectable by [`OptimizerKind`].
use crate::{
    a2c::{A2c, A2cConfig},
    actor_critic::ActorCriticConfig,
    ppo::{Ppo, PpoConfig},
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use summit_core::{
    error::SummitError, record::Recorder, Agent, OptimizerKind, Policy, VecEnv,
};

/// Configuration of [`CandleAgent`], tagged by the optimizer variant.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub enum AgentConfig {
    /// Configuration of PPO.
    Ppo(PpoConfig),

    /// Configuration of A2C.
    A2c(A2cConfig),
}

impl AgentConfig {
    /// Default configuration of the given variant for the given dimensions
    /// of observations and actions.
    pub fn from_kind(kind: OptimizerKind, obs_dim: usize, act_dim: usize) -> Self {
        match kind {
            OptimizerKind::Ppo => {
                let config = PpoConfig::default();
                let model_config = config.model_config.clone().dims(obs_dim, act_dim);
                Self::Ppo(config.model_config(model_config))
            }
            OptimizerKind::A2c => {
                let config = A2cConfig::default();
                let model_config = config.model_config.clone().dims(obs_dim, act_dim);
                Self::A2c(config.model_config(model_config))
            }
        }
    }

    /// The optimizer variant.
    pub fn kind(&self) -> OptimizerKind {
        match self {
            Self::Ppo(_) => OptimizerKind::Ppo,
            Self::A2c(_) => OptimizerKind::A2c,
        }
    }

    /// Configuration of the actor-critic model.
    pub fn model_config(&self) -> &ActorCriticConfig {
        match self {
            Self::Ppo(config) => &config.model_config,
            Self::A2c(config) => &config.model_config,
        }
    }

    /// Sets the entropy coefficient.
    pub fn ent_coef(self, v: f64) -> Self {
        match self {
            Self::Ppo(config) => Self::Ppo(config.ent_coef(v)),
            Self::A2c(config) => Self::A2c(config.ent_coef(v)),
        }
    }

    /// Enables or disables logging of diagnostics.
    pub fn verbose(self, v: bool) -> Self {
        match self {
            Self::Ppo(config) => Self::Ppo(config.verbose(v)),
            Self::A2c(config) => Self::A2c(config.verbose(v)),
        }
    }

    /// Sets the random seed.
    pub fn seed(self, v: u64) -> Self {
        match self {
            Self::Ppo(config) => Self::Ppo(config.seed(v)),
            Self::A2c(config) => Self::A2c(config.seed(v)),
        }
    }
}

/// Policy-gradient agent, one of the variants of [`OptimizerKind`].
pub enum CandleAgent<V> {
    /// PPO agent.
    Ppo(Ppo<V>),

    /// A2C agent.
    A2c(A2c<V>),
}

impl<V> CandleAgent<V>
where
    V: VecEnv,
    V::Obs: Into<Vec<f32>>,
    V::Act: From<Vec<f32>>,
{
    /// Constructs the agent of the variant of the configuration.
    pub fn build(config: AgentConfig) -> Result<Self> {
        match config {
            AgentConfig::Ppo(config) => Ok(Self::Ppo(Ppo::build(config)?)),
            AgentConfig::A2c(config) => Ok(Self::A2c(A2c::build(config)?)),
        }
    }

    /// Loads the agent from a directory written by [`Agent::persist`].
    ///
    /// The variant is identified by the configuration file in the directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.join("ppo.yaml").exists() {
            Ok(Self::Ppo(Ppo::load(path)?))
        } else if path.join("a2c.yaml").exists() {
            Ok(Self::A2c(A2c::load(path)?))
        } else {
            Err(SummitError::Configuration(format!(
                "No agent configuration found in {:?}",
                path
            ))
            .into())
        }
    }

    /// The optimizer variant.
    pub fn kind(&self) -> OptimizerKind {
        match self {
            Self::Ppo(_) => OptimizerKind::Ppo,
            Self::A2c(_) => OptimizerKind::A2c,
        }
    }
}

impl<V> Policy<V> for CandleAgent<V>
where
    V: VecEnv,
    V::Obs: Into<Vec<f32>>,
    V::Act: From<Vec<f32>>,
{
    fn sample(&mut self, obs: &V::Obs) -> V::Act {
        match self {
            Self::Ppo(agent) => agent.sample(obs),
            Self::A2c(agent) => agent.sample(obs),
        }
    }
}

impl<V> Agent<V> for CandleAgent<V>
where
    V: VecEnv,
    V::Obs: Into<Vec<f32>>,
    V::Act: From<Vec<f32>>,
{
    fn train(&mut self) {
        match self {
            Self::Ppo(agent) => agent.train(),
            Self::A2c(agent) => agent.train(),
        }
    }

    fn eval(&mut self) {
        match self {
            Self::Ppo(agent) => agent.eval(),
            Self::A2c(agent) => agent.eval(),
        }
    }

    fn is_train(&self) -> bool {
        match self {
            Self::Ppo(agent) => agent.is_train(),
            Self::A2c(agent) => agent.is_train(),
        }
    }

    fn improve(&mut self, env: &mut V, budget: usize, recorder: &mut dyn Recorder) -> Result<()> {
        match self {
            Self::Ppo(agent) => agent.improve(env, budget, recorder),
            Self::A2c(agent) => agent.improve(env, budget, recorder),
        }
    }

    fn persist(&self, path: &Path) -> Result<()> {
        match self {
            Self::Ppo(agent) => agent.persist(path),
            Self::A2c(agent) => agent.persist(path),
        }
    }
}
