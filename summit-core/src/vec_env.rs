//! Batch adapter over a single environment.
use crate::{Env, VecEnv, VecStep};
use anyhow::Result;

/// Presents a single [`Env`] as a [`VecEnv`] with batch size 1.
///
/// Calls are forwarded to the wrapped environment without additional logic:
/// episodes are not reset automatically when they end.
pub struct DummyVecEnv<E: Env> {
    envs: Vec<E>,
}

impl<E: Env> DummyVecEnv<E> {
    /// Wraps an environment.
    pub fn new(env: E) -> Self {
        Self { envs: vec![env] }
    }

    /// Builds the wrapped environment from its configuration.
    pub fn build(config: &E::Config, seed: i64) -> Result<Self> {
        Ok(Self::new(E::build(config, seed)?))
    }

    /// The wrapped environments.
    pub fn envs(&self) -> &[E] {
        &self.envs
    }
}

impl<E: Env> VecEnv for DummyVecEnv<E> {
    type Obs = E::Obs;
    type Act = E::Act;
    type Info = E::Info;

    fn n_envs(&self) -> usize {
        self.envs.len()
    }

    fn reset(&mut self) -> Result<Vec<Self::Obs>> {
        self.envs.iter_mut().map(|env| env.reset()).collect()
    }

    fn step(&mut self, acts: &[Self::Act]) -> VecStep<Self> {
        debug_assert_eq!(acts.len(), self.envs.len());
        let n = self.envs.len();
        let mut step = VecStep {
            obs: Vec::with_capacity(n),
            reward: Vec::with_capacity(n),
            is_done: Vec::with_capacity(n),
            info: Vec::with_capacity(n),
        };

        for (env, act) in self.envs.iter_mut().zip(acts) {
            let (obs, reward, is_done, info) = env.step(act).into_tuple();
            step.obs.push(obs);
            step.reward.push(reward);
            step.is_done.push(is_done);
            step.info.push(info);
        }

        step
    }

    fn observe(&self) -> Vec<Self::Obs> {
        self.envs.iter().map(|env| env.observe()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        env::{reward, PeakEnv},
        Vec2,
    };

    #[test]
    fn test_batch_of_one() -> Result<()> {
        let mut env = DummyVecEnv::new(PeakEnv::new(Vec2::new(2.0, 3.0)));
        assert_eq!(env.n_envs(), 1);
        assert_eq!(env.observe(), vec![Vec2::new(2.0, 3.0)]);

        let step = env.step(&[Vec2::new(-1.0, -1.0)]);
        assert_eq!(step.len(), 1);
        assert!(!step.any_done());
        let (obs, rewards, dones, infos) = step.into_tuple();
        assert_eq!(obs, vec![Vec2::new(1.0, 2.0)]);
        assert_eq!(rewards, vec![reward(&Vec2::new(1.0, 2.0))]);
        assert_eq!(dones, vec![false]);
        assert_eq!(infos, vec![()]);

        assert_eq!(env.reset()?, vec![Vec2::zeros()]);
        assert_eq!(env.envs()[0].state(), Vec2::zeros());
        Ok(())
    }
}
