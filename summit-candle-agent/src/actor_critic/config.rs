use crate::{
    mlp::{Activation, MlpConfig},
    opt::OptimizerConfig,
};
use serde::{Deserialize, Serialize};

/// Configuration of [`ActorCritic`](super::ActorCritic).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ActorCriticConfig {
    /// Dimension of observations.
    pub obs_dim: usize,

    /// Dimension of actions.
    pub act_dim: usize,

    /// Units of the hidden layers of both the policy and the value networks.
    pub units: Vec<usize>,

    /// Activation of the hidden layers.
    pub activation: Activation,

    /// Initial value of the log standard deviation of the action distribution.
    pub log_std_init: f64,

    /// Optimizer of all parameters.
    pub opt_config: OptimizerConfig,
}

impl Default for ActorCriticConfig {
    fn default() -> Self {
        Self {
            obs_dim: 2,
            act_dim: 2,
            units: vec![64, 64],
            activation: Activation::Tanh,
            log_std_init: 0.0,
            opt_config: OptimizerConfig::default(),
        }
    }
}

impl ActorCriticConfig {
    /// Sets the dimensions of observations and actions.
    pub fn dims(mut self, obs_dim: usize, act_dim: usize) -> Self {
        self.obs_dim = obs_dim;
        self.act_dim = act_dim;
        self
    }

    /// Sets the hidden units.
    pub fn units(mut self, v: Vec<usize>) -> Self {
        self.units = v;
        self
    }

    /// Sets the activation of hidden layers.
    pub fn activation(mut self, v: Activation) -> Self {
        self.activation = v;
        self
    }

    /// Sets the initial log standard deviation.
    pub fn log_std_init(mut self, v: f64) -> Self {
        self.log_std_init = v;
        self
    }

    /// Sets the optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    pub(super) fn pi_config(&self) -> MlpConfig {
        MlpConfig::new(self.obs_dim, self.units.clone(), self.act_dim, self.activation)
    }

    pub(super) fn vf_config(&self) -> MlpConfig {
        MlpConfig::new(self.obs_dim, self.units.clone(), 1, self.activation)
    }
}
