use super::reward;
use crate::{Env, Step, Vec2};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`PeakEnv`].
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct PeakEnvConfig {
    /// State of the environment right after construction.
    pub initial_state: Vec2,
}

impl PeakEnvConfig {
    /// Sets the initial state.
    pub fn initial_state(mut self, v: Vec2) -> Self {
        self.initial_state = v;
        self
    }

    /// Constructs [`PeakEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`PeakEnvConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// A point on the plane moved by displacement actions.
///
/// * Observation: the current state.
/// * Action: a displacement, each coordinate expected in `[-1, 1]`.
///   The bound is a contract with the agent and is not enforced here;
///   out-of-range actions are integrated as they are.
/// * Reward: [`reward`] evaluated on the state after the action.
/// * Episodes never end by themselves, `is_done` is always `false`.
///
/// Note that [`Env::reset`] moves the point back to the origin, not to
/// [`PeakEnvConfig::initial_state`]. The initial state is only the state
/// held between construction and the first reset.
#[derive(Clone, Debug)]
pub struct PeakEnv {
    state: Vec2,
}

impl PeakEnv {
    /// Constructs the environment at the given state.
    pub fn new(initial_state: Vec2) -> Self {
        Self {
            state: initial_state,
        }
    }

    /// The current state.
    pub fn state(&self) -> Vec2 {
        self.state
    }
}

impl Env for PeakEnv {
    type Config = PeakEnvConfig;
    type Obs = Vec2;
    type Act = Vec2;
    type Info = ();

    /// The dynamics are deterministic, `seed` is ignored.
    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self::new(config.initial_state))
    }

    fn step(&mut self, a: &Self::Act) -> Step<Self> {
        self.state = self.state + *a;
        let r = reward(&self.state);
        Step::new(self.state, r, false, ())
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.state = Vec2::zeros();
        Ok(self.state)
    }

    fn observe(&self) -> Self::Obs {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_step_adds_action() {
        let mut env = PeakEnv::new(Vec2::zeros());
        let (obs, r, done, _) = env.step(&Vec2::new(1.0, 0.0)).into_tuple();
        assert_eq!(obs, Vec2::new(1.0, 0.0));
        assert_eq!(r, reward(&Vec2::new(1.0, 0.0)));
        assert!(!done);

        let mut env = PeakEnv::new(Vec2::new(2.0, 3.0));
        let step = env.step(&Vec2::new(-1.0, -1.0));
        assert_eq!(step.obs, Vec2::new(1.0, 2.0));
        assert_eq!(env.observe(), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_step_is_never_done() {
        let mut env = PeakEnv::new(Vec2::zeros());
        for i in 0..500 {
            let a = Vec2::new((i as f64 * 0.37).sin(), (i as f64 * 0.11).cos());
            let s = env.state();
            let step = env.step(&a);
            assert!(!step.is_done);
            assert_eq!(step.obs, s + a);
            assert_eq!(step.reward, reward(&(s + a)));
        }
    }

    #[test]
    fn test_out_of_range_action_is_not_clamped() {
        let mut env = PeakEnv::new(Vec2::zeros());
        let step = env.step(&Vec2::new(5.0, -3.0));
        assert_eq!(step.obs, Vec2::new(5.0, -3.0));
    }

    #[test]
    fn test_non_finite_action_propagates() {
        let mut env = PeakEnv::new(Vec2::zeros());
        let step = env.step(&Vec2::new(f64::NAN, 0.0));
        assert!(step.obs.x.is_nan());
        assert!(step.reward.is_nan());
    }

    #[test]
    fn test_reset_returns_origin() -> Result<()> {
        let config = PeakEnvConfig::default().initial_state(Vec2::new(3.0, -4.0));
        let mut env = PeakEnv::build(&config, 0)?;
        assert_eq!(env.observe(), Vec2::new(3.0, -4.0));

        env.step(&Vec2::new(0.5, 0.5));
        assert_eq!(env.reset()?, Vec2::zeros());
        assert_eq!(env.reset()?, Vec2::zeros());
        assert_eq!(env.observe(), Vec2::zeros());
        Ok(())
    }

    #[test]
    fn test_serde_config() -> Result<()> {
        let config = PeakEnvConfig::default().initial_state(Vec2::new(0.5, -1.5));
        let dir = TempDir::new("peak_env_config")?;
        let path = dir.path().join("env.yaml");
        config.save(&path)?;
        assert_eq!(PeakEnvConfig::load(&path)?, config);
        Ok(())
    }
}
