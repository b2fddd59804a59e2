//! Rollout buffer of on-policy agents.
use crate::{
    actor_critic::ActorCritic,
    util::{gaussian_logp, obs_to_tensor, randn},
};
use anyhow::Result;
use candle_core::{Device, Tensor};
use log::{debug, info};
use summit_core::{
    record::{Record, RecordValue, Recorder},
    VecEnv, VecStep,
};

/// Transitions collected with the current policy.
///
/// Each field is flattened in the order `(step, env)`.
pub struct RolloutBuffer {
    n_envs: usize,
    obs_dim: usize,
    act_dim: usize,
    obs: Vec<f32>,
    act: Vec<f32>,
    rewards: Vec<f32>,
    dones: Vec<f32>,
    values: Vec<f32>,
    logps: Vec<f32>,
}

/// Tensors of a rollout, or of a minibatch of it.
pub struct RolloutBatch {
    /// Observations, shape `[n, obs_dim]`.
    pub obs: Tensor,

    /// Actions before clipping, shape `[n, act_dim]`.
    pub act: Tensor,

    /// Values estimated during the rollout, shape `[n]`.
    pub old_values: Tensor,

    /// Log probabilities of the actions during the rollout, shape `[n]`.
    pub old_logp: Tensor,

    /// Advantages, shape `[n]`.
    pub advantages: Tensor,

    /// Targets of the value function, shape `[n]`.
    pub returns: Tensor,
}

impl RolloutBatch {
    /// Selects samples with the given indices, a `u32` tensor.
    pub fn select(&self, idx: &Tensor) -> Result<Self> {
        Ok(Self {
            obs: self.obs.index_select(idx, 0)?,
            act: self.act.index_select(idx, 0)?,
            old_values: self.old_values.index_select(idx, 0)?,
            old_logp: self.old_logp.index_select(idx, 0)?,
            advantages: self.advantages.index_select(idx, 0)?,
            returns: self.returns.index_select(idx, 0)?,
        })
    }

    /// The number of samples.
    pub fn len(&self) -> usize {
        self.advantages.dims()[0]
    }

    /// Returns `true` if the batch has no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RolloutBuffer {
    /// Creates an empty buffer.
    pub fn new(n_envs: usize, obs_dim: usize, act_dim: usize) -> Self {
        Self {
            n_envs,
            obs_dim,
            act_dim,
            obs: vec![],
            act: vec![],
            rewards: vec![],
            dones: vec![],
            values: vec![],
            logps: vec![],
        }
    }

    /// Removes all transitions.
    pub fn clear(&mut self) {
        self.obs.clear();
        self.act.clear();
        self.rewards.clear();
        self.dones.clear();
        self.values.clear();
        self.logps.clear();
    }

    /// The number of steps stored, each covering all environments.
    pub fn len(&self) -> usize {
        self.rewards.len() / self.n_envs
    }

    /// Returns `true` if no transition is stored.
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Rewards stored so far.
    pub fn rewards(&self) -> &[f32] {
        &self.rewards
    }

    /// Adds a step of all environments.
    pub fn push(
        &mut self,
        obs: &[f32],
        act: &[f32],
        reward: &[f64],
        is_done: &[bool],
        value: &[f32],
        logp: &[f32],
    ) {
        debug_assert_eq!(obs.len(), self.n_envs * self.obs_dim);
        debug_assert_eq!(act.len(), self.n_envs * self.act_dim);
        debug_assert_eq!(reward.len(), self.n_envs);
        self.obs.extend_from_slice(obs);
        self.act.extend_from_slice(act);
        self.rewards.extend(reward.iter().map(|r| *r as f32));
        self.dones
            .extend(is_done.iter().map(|d| if *d { 1f32 } else { 0f32 }));
        self.values.extend_from_slice(value);
        self.logps.extend_from_slice(logp);
    }

    /// Computes advantages with generalized advantage estimation and the
    /// targets of the value function.
    ///
    /// `last_values` are the values of the observations following the last
    /// stored step.
    pub fn advantages_and_returns(
        &self,
        last_values: &[f32],
        gamma: f64,
        gae_lambda: f64,
    ) -> (Vec<f32>, Vec<f32>) {
        let (gamma, gae_lambda) = (gamma as f32, gae_lambda as f32);
        let n = self.n_envs;
        let n_steps = self.len();
        let mut advantages = vec![0f32; self.rewards.len()];

        for e in 0..n {
            let mut last_gae = 0f32;
            for t in (0..n_steps).rev() {
                let i = t * n + e;
                let next_non_terminal = 1.0 - self.dones[i];
                let next_value = if t == n_steps - 1 {
                    last_values[e]
                } else {
                    self.values[i + n]
                };
                let delta =
                    self.rewards[i] + gamma * next_value * next_non_terminal - self.values[i];
                last_gae = delta + gamma * gae_lambda * next_non_terminal * last_gae;
                advantages[i] = last_gae;
            }
        }

        let returns = advantages
            .iter()
            .zip(self.values.iter())
            .map(|(a, v)| a + v)
            .collect();

        (advantages, returns)
    }

    /// Converts the buffer into tensors.
    pub fn batch(&self, last_values: &[f32], gamma: f64, gae_lambda: f64, device: &Device) -> Result<RolloutBatch> {
        let n = self.rewards.len();
        let (advantages, returns) = self.advantages_and_returns(last_values, gamma, gae_lambda);

        Ok(RolloutBatch {
            obs: Tensor::from_slice(&self.obs, (n, self.obs_dim), device)?,
            act: Tensor::from_slice(&self.act, (n, self.act_dim), device)?,
            old_values: Tensor::from_slice(&self.values, n, device)?,
            old_logp: Tensor::from_slice(&self.logps, n, device)?,
            advantages: Tensor::from_vec(advantages, n, device)?,
            returns: Tensor::from_vec(returns, n, device)?,
        })
    }
}

/// Runs the current policy for `n_steps` steps and stores the transitions.
///
/// Actions are sampled from the Gaussian policy; the unclipped action is
/// stored while the action sent to the environment is clipped to
/// `[-action_bound, action_bound]`. If any environment reports termination,
/// all environments are reset. `obs` holds the latest observations across
/// calls. Returns the values of the observations after the last step.
pub fn collect<V>(
    env: &mut V,
    model: &ActorCritic,
    rng: &mut fastrand::Rng,
    obs: &mut Vec<V::Obs>,
    n_steps: usize,
    action_bound: f64,
    buffer: &mut RolloutBuffer,
) -> Result<Vec<f32>>
where
    V: VecEnv,
    V::Obs: Into<Vec<f32>>,
    V::Act: From<Vec<f32>>,
{
    let device = model.device();
    let act_dim = model.config().act_dim;
    let bound = action_bound as f32;

    for _ in 0..n_steps {
        let obs_t = obs_to_tensor(obs, device)?;
        let mean = model.mean(&obs_t)?;
        let value = model.value(&obs_t)?;
        let noise = Tensor::from_vec(randn(rng, obs.len() * act_dim), mean.dims(), device)?;
        let act_t = mean.add(&noise.broadcast_mul(&model.log_std().exp()?)?)?;
        let logp = gaussian_logp(&act_t, &mean, model.log_std())?;

        let act = act_t.flatten_all()?.to_vec1::<f32>()?;
        let acts = act
            .chunks(act_dim)
            .map(|a| V::Act::from(a.iter().map(|x| x.clamp(-bound, bound)).collect()))
            .collect::<Vec<_>>();

        let step: VecStep<V> = env.step(&acts);
        let obs_flat = obs.iter().flat_map(|o| o.clone().into()).collect::<Vec<f32>>();
        buffer.push(
            &obs_flat,
            &act,
            &step.reward,
            &step.is_done,
            &value.to_vec1::<f32>()?,
            &logp.to_vec1::<f32>()?,
        );

        let any_done = step.any_done();
        *obs = step.obs;
        if any_done {
            debug!("Episode terminated, reset environments");
            *obs = env.reset()?;
        }
    }

    let obs_t = obs_to_tensor(obs, device)?;
    Ok(model.value(&obs_t)?.to_vec1::<f32>()?)
}

/// Settings of [`train_on_rollouts`] shared by the on-policy agents.
pub struct RolloutParams {
    /// Name of the algorithm in log messages.
    pub name: &'static str,

    /// The number of steps per environment in a rollout.
    pub n_steps: usize,

    /// Discount factor.
    pub gamma: f64,

    /// Bias-variance trade-off of generalized advantage estimation.
    pub gae_lambda: f64,

    /// Actions are clipped to `[-action_bound, action_bound]`.
    pub action_bound: f64,

    /// Logs diagnostics if `true`.
    pub verbose: bool,

    /// Diagnostics are logged every `log_interval` rollouts.
    pub log_interval: usize,
}

/// Alternates rollouts and policy updates until `budget` interactions are consumed.
///
/// The environment is reset first. The last rollout is truncated to the
/// remaining budget. After every rollout `update` is called with the
/// collected batch, and its record is written to `recorder` together with
/// `env_steps`, `mean_reward` and `log_std`.
pub fn train_on_rollouts<V, U>(
    env: &mut V,
    model: &mut ActorCritic,
    rng: &mut fastrand::Rng,
    params: &RolloutParams,
    budget: usize,
    recorder: &mut dyn Recorder,
    mut update: U,
) -> Result<()>
where
    V: VecEnv,
    V::Obs: Into<Vec<f32>>,
    V::Act: From<Vec<f32>>,
    U: FnMut(&mut ActorCritic, &mut fastrand::Rng, &RolloutBatch) -> Result<Record>,
{
    let n_envs = env.n_envs();
    let (obs_dim, act_dim) = (model.config().obs_dim, model.config().act_dim);
    let mut buffer = RolloutBuffer::new(n_envs, obs_dim, act_dim);
    let device = model.device().clone();
    let mut obs = env.reset()?;
    let mut env_steps = 0;
    let mut n_rollouts = 0;

    while env_steps < budget {
        let n_steps = params.n_steps.min((budget - env_steps) / n_envs);
        if n_steps == 0 {
            break;
        }

        buffer.clear();
        let last_values = collect(
            env,
            model,
            rng,
            &mut obs,
            n_steps,
            params.action_bound,
            &mut buffer,
        )?;
        env_steps += n_steps * n_envs;
        n_rollouts += 1;

        let batch = buffer.batch(&last_values, params.gamma, params.gae_lambda, &device)?;
        let mean_reward = buffer.rewards().iter().sum::<f32>() / buffer.rewards().len() as f32;
        let mut progress = Record::from_scalar("env_steps", env_steps as f32);
        progress.insert("mean_reward", RecordValue::Scalar(mean_reward));
        let mut record = update(model, rng, &batch)?.merge(progress);

        if params.verbose && n_rollouts % params.log_interval.max(1) == 0 {
            info!(
                "{}: env_steps = {}, mean_reward = {:.4}, loss_policy = {:.4}, loss_value = {:.4}",
                params.name,
                env_steps,
                mean_reward,
                record.get_scalar("loss_policy")?,
                record.get_scalar("loss_value")?,
            );
        }

        record.insert(
            "log_std",
            RecordValue::Array1(model.log_std().to_vec1::<f32>()?),
        );
        recorder.write(record);
    }

    Ok(())
}
