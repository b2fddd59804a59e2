//! Batched environment.
use super::{Act, Info, Obs, VecStep};
use anyhow::Result;
use std::fmt::Debug;

/// A batch of environments driven in lock step.
///
/// Agents only talk to environments through this trait, so the same training
/// code works regardless of how many environment instances are wrapped.
pub trait VecEnv {
    /// Observation of a single environment.
    type Obs: Obs;

    /// Action of a single environment.
    type Act: Act;

    /// Information of a single environment step.
    type Info: Info + Clone + Debug;

    /// Returns the number of wrapped environments.
    fn n_envs(&self) -> usize;

    /// Resets all environments and returns their observations.
    fn reset(&mut self) -> Result<Vec<Self::Obs>>;

    /// Performs a step in every environment, `acts[i]` being applied to the `i`-th one.
    fn step(&mut self, acts: &[Self::Act]) -> VecStep<Self>
    where
        Self: Sized;

    /// Returns the current observations without changing the environments.
    fn observe(&self) -> Vec<Self::Obs>;
}
