//! Agent.
use super::{Policy, VecEnv};
use crate::record::Recorder;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable policy on an environment.
///
/// The environment is not owned by the agent. It is lent to [`Agent::improve`],
/// which is the only place the agent interacts with it on its own.
pub trait Agent<V: VecEnv>: Policy<V> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Improves the policy by interacting with `env`.
    ///
    /// Exactly `budget` environment interactions are consumed before returning.
    /// One interaction is a single step of a single wrapped environment.
    /// Diagnostics of every policy update are written to `recorder`.
    fn improve(&mut self, env: &mut V, budget: usize, recorder: &mut dyn Recorder) -> Result<()>;

    /// Saves the policy in the given directory.
    fn persist(&self, path: &Path) -> Result<()>;
}
