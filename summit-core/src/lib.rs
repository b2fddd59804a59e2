#![warn(missing_docs)]
//! Core of summit, a harness for maximizing a two-dimensional function
//! with policy-gradient agents.
//!
//! The crate defines the interaction protocol between an environment and an
//! agent ([`Env`], [`VecEnv`], [`Policy`], [`Agent`]), the function-maximization
//! environment itself ([`env::PeakEnv`]), the batch adapter used by agents
//! ([`vec_env::DummyVecEnv`]) and the [`Experiment`] driver which trains,
//! evaluates and persists an agent.
pub mod env;
pub mod error;
pub mod record;
pub mod util;
pub mod vec_env;

mod base;
pub use base::{Act, Agent, Env, Info, Obs, Policy, Step, Vec2, VecEnv, VecStep};

mod experiment;
pub use experiment::{
    Experiment, ExperimentConfig, ExperimentReport, OptimizerKind, Phase, EVAL_HORIZON,
};
