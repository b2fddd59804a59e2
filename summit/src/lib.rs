//! Trains a policy-gradient agent to find the peak of a two-dimensional
//! function, evaluates it and saves it.
//!
//! The environment is [`PeakEnv`] wrapped in [`DummyVecEnv`], the agent is a
//! [`CandleAgent`] and the run is driven by [`Experiment`].
use anyhow::Result;
use log::info;
use std::path::{Path, PathBuf};
use summit_candle_agent::{AgentConfig, CandleAgent};
use summit_core::{
    env::PeakEnv,
    record::{NullRecorder, Recorder},
    vec_env::DummyVecEnv,
    Experiment, ExperimentConfig, ExperimentReport, OptimizerKind, Vec2,
};
use summit_tensorboard::TensorboardRecorder;

/// Dimension of observations and actions.
const DIM: usize = 2;

/// Environment used for training and evaluation.
pub type Env = DummyVecEnv<PeakEnv>;

/// Agent trained in [`Env`].
pub type Agent = CandleAgent<Env>;

/// Creates the agent of the given variant with its default hyperparameters.
pub fn create_agent(kind: OptimizerKind, seed: Option<u64>, verbose: bool) -> Result<Agent> {
    let mut config = AgentConfig::from_kind(kind, DIM, DIM).verbose(verbose);
    if let Some(seed) = seed {
        config = config.seed(seed);
    }
    Agent::build(config)
}

/// Default log directory of the given variant, `./<variant>_tensorboard`.
pub fn default_tensorboard_dir(kind: OptimizerKind) -> PathBuf {
    PathBuf::from(format!("./{}_tensorboard", kind.tag()))
}

/// Creates a tensorboard recorder, or a recorder discarding everything if
/// no directory is given.
pub fn create_recorder(logdir: Option<&Path>) -> Box<dyn Recorder> {
    match logdir {
        Some(logdir) => {
            info!("Write training diagnostics to {:?}", logdir);
            Box::new(TensorboardRecorder::new(logdir))
        }
        None => Box::new(NullRecorder::new()),
    }
}

/// Builds the environment and the agent from `config`, then trains,
/// evaluates and saves the agent.
pub fn run(
    config: ExperimentConfig,
    verbose: bool,
    recorder: &mut dyn Recorder,
) -> Result<ExperimentReport<Vec2>> {
    let seed = config.seed;
    // environment seeds are non-negative
    let env_seed = (seed.unwrap_or(0) & i64::MAX as u64) as i64;
    let env = Env::build(&config.env_config(), env_seed)?;
    let mut experiment = Experiment::build(config, env, |kind| create_agent(kind, seed, verbose))?;
    experiment.run(recorder)
}
