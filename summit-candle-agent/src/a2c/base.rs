use super::A2cConfig;
use crate::{
    actor_critic::ActorCritic,
    rollout::{train_on_rollouts, RolloutBatch, RolloutParams},
    util::normalize,
};
use anyhow::{Context, Result};
use candle_core::Device;
use candle_nn::loss::mse;
use log::trace;
use std::{convert::TryFrom, fs, marker::PhantomData, path::Path};
use summit_core::{
    error::SummitError,
    record::{Record, RecordValue, Recorder},
    Agent, Policy, VecEnv,
};

const CONFIG_FILE: &str = "a2c.yaml";

/// Diagnostics are logged every `LOG_INTERVAL` updates.
const LOG_INTERVAL: usize = 100;

/// Synchronous advantage actor-critic (A2C) agent with a Gaussian policy.
///
/// The parameters are updated once per rollout of `n_steps` steps per
/// environment, with the whole rollout as a single batch.
pub struct A2c<V> {
    config: A2cConfig,
    model: ActorCritic,
    rng: fastrand::Rng,
    train: bool,
    n_updates: usize,
    phantom: PhantomData<V>,
}

impl<V> A2c<V>
where
    V: VecEnv,
    V::Obs: Into<Vec<f32>>,
    V::Act: From<Vec<f32>>,
{
    /// Constructs A2C agent.
    pub fn build(config: A2cConfig) -> Result<Self> {
        if config.n_steps == 0 {
            return Err(SummitError::Configuration(
                "n_steps of A2C must be positive".to_string(),
            )
            .into());
        }
        let device = Device::try_from(config.device)?;
        let model = ActorCritic::build(config.model_config.clone(), device)?;
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        Ok(Self {
            config,
            model,
            rng,
            train: false,
            n_updates: 0,
            phantom: PhantomData,
        })
    }

    /// Constructs A2C agent from a directory written by [`Agent::persist`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = A2cConfig::load(path.join(CONFIG_FILE))
            .with_context(|| format!("No A2C configuration in {:?}", path))?;
        let mut agent = Self::build(config)?;
        agent.model.load(path)?;
        Ok(agent)
    }

    /// The configuration.
    pub fn config(&self) -> &A2cConfig {
        &self.config
    }

    /// The actor-critic model.
    pub fn model(&self) -> &ActorCritic {
        &self.model
    }
}

/// Takes a single gradient step on the whole rollout.
fn update(
    config: &A2cConfig,
    model: &mut ActorCritic,
    n_updates: &mut usize,
    batch: &RolloutBatch,
) -> Result<Record> {
    let (values, logp, entropy) = model.evaluate_actions(&batch.obs, &batch.act)?;
    let adv = if config.normalize_advantage && batch.len() > 1 {
        normalize(&batch.advantages)?
    } else {
        batch.advantages.clone()
    };

    let loss_policy = logp.mul(&adv)?.mean_all()?.neg()?;
    let loss_value = mse(&values, &batch.returns)?;
    let loss =
        ((&loss_policy + (&loss_value * config.vf_coef)?)? - (&entropy * config.ent_coef)?)?;

    trace!("backward_step()");
    let grad_norm = model.backward_step(&loss, config.max_grad_norm)?;
    *n_updates += 1;

    Ok(Record::from_slice(&[
        ("loss_policy", RecordValue::Scalar(loss_policy.to_scalar::<f32>()?)),
        ("loss_value", RecordValue::Scalar(loss_value.to_scalar::<f32>()?)),
        ("entropy", RecordValue::Scalar(entropy.to_scalar::<f32>()?)),
        ("grad_norm", RecordValue::Scalar(grad_norm)),
        ("n_updates", RecordValue::Scalar(*n_updates as f32)),
    ]))
}

impl<V> Policy<V> for A2c<V>
where
    V: VecEnv,
    V::Obs: Into<Vec<f32>>,
    V::Act: From<Vec<f32>>,
{
    fn sample(&mut self, obs: &V::Obs) -> V::Act {
        let rng = if self.train { Some(&mut self.rng) } else { None };
        let act = self
            .model
            .act(obs.clone().into(), rng, self.config.action_bound)
            .expect("Failed in A2c::sample()");
        act.into()
    }
}

impl<V> Agent<V> for A2c<V>
where
    V: VecEnv,
    V::Obs: Into<Vec<f32>>,
    V::Act: From<Vec<f32>>,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn improve(&mut self, env: &mut V, budget: usize, recorder: &mut dyn Recorder) -> Result<()> {
        let params = RolloutParams {
            name: "A2C",
            n_steps: self.config.n_steps,
            gamma: self.config.gamma,
            gae_lambda: self.config.gae_lambda,
            action_bound: self.config.action_bound,
            verbose: self.config.verbose,
            log_interval: LOG_INTERVAL,
        };
        let config = &self.config;
        let n_updates = &mut self.n_updates;

        train_on_rollouts(
            env,
            &mut self.model,
            &mut self.rng,
            &params,
            budget,
            recorder,
            |model, _rng, batch| update(config, model, n_updates, batch),
        )
    }

    fn persist(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        self.model.save(path)?;
        self.config.save(path.join(CONFIG_FILE))?;
        Ok(())
    }
}
