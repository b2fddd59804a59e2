//! Utilities for interaction of agents and environments.
use crate::{
    record::{Record, RecordValue, Recorder},
    Policy, VecEnv,
};
use anyhow::Result;

/// Runs a rollout of `n_steps` steps with a policy.
///
/// The environment is reset first. Then the policy picks an action for every
/// wrapped environment from its latest observation, and the batch of actions
/// is applied. Episodes never being cut short, exactly `n_steps` steps are
/// performed. Returns the reward of the first environment at every step.
///
/// Every step is written to `recorder` with keys `eval_step` and `eval_reward`.
pub fn rollout<V, P>(
    env: &mut V,
    policy: &mut P,
    n_steps: usize,
    recorder: &mut dyn Recorder,
) -> Result<Vec<f64>>
where
    V: VecEnv,
    P: Policy<V> + ?Sized,
{
    let mut rewards = Vec::with_capacity(n_steps);
    let mut prev_obs = env.reset()?;

    for count_step in 0..n_steps {
        let acts: Vec<_> = prev_obs.iter().map(|o| policy.sample(o)).collect();
        let step = env.step(&acts);
        let reward = step.reward[0];
        rewards.push(reward);

        recorder.write(Record::from_slice(&[
            ("eval_step", RecordValue::Scalar(count_step as _)),
            ("eval_reward", RecordValue::Scalar(reward as _)),
        ]));

        prev_obs = step.obs;
    }

    Ok(rewards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        env::{reward, PeakEnv},
        record::BufferedRecorder,
        vec_env::DummyVecEnv,
        Vec2,
    };

    struct Constant(Vec2);

    impl Policy<DummyVecEnv<PeakEnv>> for Constant {
        fn sample(&mut self, _obs: &Vec2) -> Vec2 {
            self.0
        }
    }

    #[test]
    fn test_rollout_starts_from_reset() -> Result<()> {
        let mut env = DummyVecEnv::new(PeakEnv::new(Vec2::new(10.0, 10.0)));
        let mut policy = Constant(Vec2::new(0.5, -0.5));
        let mut recorder = BufferedRecorder::new();
        let rewards = rollout(&mut env, &mut policy, 2, &mut recorder)?;

        assert_eq!(env.observe(), vec![Vec2::new(1.0, -1.0)]);
        assert_eq!(
            rewards,
            vec![reward(&Vec2::new(0.5, -0.5)), reward(&Vec2::new(1.0, -1.0))]
        );
        assert_eq!(recorder.len(), 2);
        let last = recorder.iter().last().expect("two records");
        assert_eq!(last.get_scalar("eval_step")?, 1.0);
        assert_eq!(last.get_scalar("eval_reward")?, reward(&Vec2::new(1.0, -1.0)) as f32);
        Ok(())
    }
}
