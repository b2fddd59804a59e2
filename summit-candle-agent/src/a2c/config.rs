//! Configuration of A2C agent.
use crate::{actor_critic::ActorCriticConfig, opt::OptimizerConfig, Device};
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`A2c`](super::A2c).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct A2cConfig {
    /// Configuration of the actor-critic model.
    pub model_config: ActorCriticConfig,

    /// The number of steps per environment in a rollout.
    pub n_steps: usize,

    /// Discount factor.
    pub gamma: f64,

    /// Bias-variance trade-off of generalized advantage estimation.
    pub gae_lambda: f64,

    /// Coefficient of the entropy bonus.
    pub ent_coef: f64,

    /// Coefficient of the value loss.
    pub vf_coef: f64,

    /// Maximum norm of gradients.
    pub max_grad_norm: f64,

    /// If `true`, advantages are normalized in each update.
    pub normalize_advantage: bool,

    /// Actions are clipped to `[-action_bound, action_bound]`.
    pub action_bound: f64,

    /// Logs training diagnostics.
    pub verbose: bool,

    /// Seed of the random number generator for exploration noise.
    pub seed: Option<u64>,

    /// Device of the model.
    pub device: Device,
}

impl Default for A2cConfig {
    fn default() -> Self {
        Self {
            model_config: ActorCriticConfig::default().opt_config(OptimizerConfig::RmsProp {
                lr: 7e-4,
                alpha: 0.99,
                eps: 1e-5,
            }),
            n_steps: 5,
            gamma: 0.99,
            gae_lambda: 1.0,
            ent_coef: 0.01,
            vf_coef: 0.5,
            max_grad_norm: 0.5,
            normalize_advantage: false,
            action_bound: 1.0,
            verbose: true,
            seed: None,
            device: Device::Cpu,
        }
    }
}

impl A2cConfig {
    /// Configuration of the actor-critic model.
    pub fn model_config(mut self, v: ActorCriticConfig) -> Self {
        self.model_config = v;
        self
    }

    /// Sets the number of steps per environment in a rollout.
    pub fn n_steps(mut self, v: usize) -> Self {
        self.n_steps = v;
        self
    }

    /// Discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// GAE lambda.
    pub fn gae_lambda(mut self, v: f64) -> Self {
        self.gae_lambda = v;
        self
    }

    /// Entropy coefficient.
    pub fn ent_coef(mut self, v: f64) -> Self {
        self.ent_coef = v;
        self
    }

    /// Value function coefficient.
    pub fn vf_coef(mut self, v: f64) -> Self {
        self.vf_coef = v;
        self
    }

    /// Maximum norm of gradients.
    pub fn max_grad_norm(mut self, v: f64) -> Self {
        self.max_grad_norm = v;
        self
    }

    /// Enables or disables advantage normalization.
    pub fn normalize_advantage(mut self, v: bool) -> Self {
        self.normalize_advantage = v;
        self
    }

    /// Bound of actions.
    pub fn action_bound(mut self, v: f64) -> Self {
        self.action_bound = v;
        self
    }

    /// Enables or disables logging of diagnostics.
    pub fn verbose(mut self, v: bool) -> Self {
        self.verbose = v;
        self
    }

    /// Random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = Some(v);
        self
    }

    /// Device.
    pub fn device(mut self, v: Device) -> Self {
        self.device = v;
        self
    }

    /// Constructs [`A2cConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of A2C agent from {:?}", path_);
        Ok(b)
    }

    /// Saves [`A2cConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of A2C agent into {:?}", path_);
        Ok(())
    }
}
