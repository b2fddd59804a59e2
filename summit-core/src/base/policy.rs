//! Policy.
use super::VecEnv;

/// A policy on an environment.
///
/// Policy is a mapping from an observation to an action.
/// The mapping can be either of deterministic or stochastic.
pub trait Policy<V: VecEnv> {
    /// Sample an action given an observation.
    fn sample(&mut self, obs: &V::Obs) -> V::Act;
}
