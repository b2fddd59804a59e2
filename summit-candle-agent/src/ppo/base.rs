use super::PpoConfig;
use crate::{
    actor_critic::ActorCritic,
    rollout::{train_on_rollouts, RolloutBatch, RolloutParams},
    util::normalize,
};
use anyhow::{Context, Result};
use candle_core::{Device, Tensor};
use candle_nn::loss::mse;
use log::trace;
use std::{convert::TryFrom, fs, marker::PhantomData, path::Path};
use summit_core::{
    error::SummitError,
    record::{Record, RecordValue, Recorder},
    Agent, Policy, VecEnv,
};

const CONFIG_FILE: &str = "ppo.yaml";

/// Proximal policy optimization (PPO) agent with a Gaussian policy.
///
/// Each call of [`Agent::improve`] alternates between collecting a rollout of
/// `n_steps` steps per environment and optimizing the clipped surrogate
/// objective over it for `n_epochs` epochs of shuffled minibatches.
pub struct Ppo<V> {
    config: PpoConfig,
    model: ActorCritic,
    rng: fastrand::Rng,
    train: bool,
    n_updates: usize,
    phantom: PhantomData<V>,
}

impl<V> Ppo<V>
where
    V: VecEnv,
    V::Obs: Into<Vec<f32>>,
    V::Act: From<Vec<f32>>,
{
    /// Constructs PPO agent.
    pub fn build(config: PpoConfig) -> Result<Self> {
        if config.n_steps == 0 || config.batch_size == 0 {
            return Err(SummitError::Configuration(format!(
                "n_steps and batch_size of PPO must be positive, got {} and {}",
                config.n_steps, config.batch_size
            ))
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

    /// Constructs PPO agent from a directory written by [`Agent::persist`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = PpoConfig::load(path.join(CONFIG_FILE))
            .with_context(|| format!("No PPO configuration in {:?}", path))?;
        let mut agent = Self::build(config)?;
        agent.model.load(path)?;
        Ok(agent)
    }

    /// The configuration.
    pub fn config(&self) -> &PpoConfig {
        &self.config
    }

    /// The actor-critic model.
    pub fn model(&self) -> &ActorCritic {
        &self.model
    }
}

/// Optimizes the clipped surrogate objective on a rollout.
fn update(
    config: &PpoConfig,
    model: &mut ActorCritic,
    rng: &mut fastrand::Rng,
    n_updates: &mut usize,
    batch: &RolloutBatch,
) -> Result<Record> {
    let n = batch.len();
    let device = model.device().clone();
    let clip = config.clip_range;

    let mut loss_policy = 0f32;
    let mut loss_value = 0f32;
    let mut entropy = 0f32;
    let mut clip_fraction = 0f32;
    let mut approx_kl = 0f32;
    let mut n_minibatches = 0;

    for _ in 0..config.n_epochs {
        let mut ixs = (0..n as u32).collect::<Vec<_>>();
        rng.shuffle(&mut ixs);

        for chunk in ixs.chunks(config.batch_size) {
            let ixs = Tensor::from_slice(chunk, chunk.len(), &device)?;
            let mb = batch.select(&ixs)?;
            let (values, logp, ent) = model.evaluate_actions(&mb.obs, &mb.act)?;

            let adv = if config.normalize_advantage && chunk.len() > 1 {
                normalize(&mb.advantages)?
            } else {
                mb.advantages.clone()
            };

            let log_ratio = (logp - &mb.old_logp)?;
            let ratio = log_ratio.exp()?;
            let surr1 = ratio.mul(&adv)?;
            let surr2 = ratio.clamp(1.0 - clip, 1.0 + clip)?.mul(&adv)?;
            let loss_pi = surr1.minimum(&surr2)?.mean_all()?.neg()?;
            let loss_v = mse(&values, &mb.returns)?;
            let loss =
                ((&loss_pi + (&loss_v * config.vf_coef)?)? - (&ent * config.ent_coef)?)?;

            trace!("backward_step()");
            model.backward_step(&loss, config.max_grad_norm)?;

            let ratio = ratio.to_vec1::<f32>()?;
            let log_ratio = log_ratio.to_vec1::<f32>()?;
            let m = ratio.len() as f32;
            clip_fraction += ratio
                .iter()
                .filter(|r| ((**r - 1.0).abs() as f64) > clip)
                .count() as f32
                / m;
            approx_kl += ratio
                .iter()
                .zip(log_ratio.iter())
                .map(|(r, lr)| (r - 1.0) - lr)
                .sum::<f32>()
                / m;
            loss_policy += loss_pi.to_scalar::<f32>()?;
            loss_value += loss_v.to_scalar::<f32>()?;
            entropy += ent.to_scalar::<f32>()?;
            n_minibatches += 1;
        }
    }
    *n_updates += n_minibatches;

    let n_minibatches = n_minibatches.max(1) as f32;
    Ok(Record::from_slice(&[
        ("loss_policy", RecordValue::Scalar(loss_policy / n_minibatches)),
        ("loss_value", RecordValue::Scalar(loss_value / n_minibatches)),
        ("entropy", RecordValue::Scalar(entropy / n_minibatches)),
        ("clip_fraction", RecordValue::Scalar(clip_fraction / n_minibatches)),
        ("approx_kl", RecordValue::Scalar(approx_kl / n_minibatches)),
        ("n_updates", RecordValue::Scalar(*n_updates as f32)),
    ]))
}

impl<V> Policy<V> for Ppo<V>
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
            .expect("Failed in Ppo::sample()");
        act.into()
    }
}

impl<V> Agent<V> for Ppo<V>
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
            name: "PPO",
            n_steps: self.config.n_steps,
            gamma: self.config.gamma,
            gae_lambda: self.config.gae_lambda,
            action_bound: self.config.action_bound,
            verbose: self.config.verbose,
            log_interval: 1,
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
            |model, rng, batch| update(config, model, rng, n_updates, batch),
        )
    }

    fn persist(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        self.model.save(path)?;
        self.config.save(path.join(CONFIG_FILE))?;
        Ok(())
    }
}
