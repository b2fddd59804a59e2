//! Environment step.
use super::{Env, VecEnv};

/// Additional information to observations and rewards.
pub trait Info {}

impl Info for () {}

/// Represents the outcome of a single environment step, `(o_t+1, r_t, done_t, info_t)`.
///
/// An environment emits a [`Step`] object at every interaction step.
/// [`Step::into_tuple`] gives the four-tuple in the order an agent consumes it.
pub struct Step<E: Env> {
    /// Observation after the action was applied.
    pub obs: E::Obs,

    /// Reward computed on the new state.
    pub reward: f64,

    /// Flag denoting if the episode is done.
    pub is_done: bool,

    /// Information defined by the environment.
    pub info: E::Info,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(obs: E::Obs, reward: f64, is_done: bool, info: E::Info) -> Self {
        Self {
            obs,
            reward,
            is_done,
            info,
        }
    }

    /// Returns `(observation, reward, done, info)`.
    pub fn into_tuple(self) -> (E::Obs, f64, bool, E::Info) {
        (self.obs, self.reward, self.is_done, self.info)
    }
}

/// Batched counterpart of [`Step`], emitted by a [`VecEnv`].
///
/// All fields have one element per wrapped environment.
pub struct VecStep<V: VecEnv> {
    /// Observations.
    pub obs: Vec<V::Obs>,

    /// Rewards.
    pub reward: Vec<f64>,

    /// Flags denoting if episodes are done.
    pub is_done: Vec<bool>,

    /// Information.
    pub info: Vec<V::Info>,
}

impl<V: VecEnv> VecStep<V> {
    /// Returns the number of environments in the batch.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Returns `true` if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }

    /// Returns `true` if any episode in the batch is done.
    pub fn any_done(&self) -> bool {
        self.is_done.iter().any(|d| *d)
    }

    /// Returns `(observations, rewards, dones, infos)`.
    pub fn into_tuple(self) -> (Vec<V::Obs>, Vec<f64>, Vec<bool>, Vec<V::Info>) {
        (self.obs, self.reward, self.is_done, self.info)
    }
}
