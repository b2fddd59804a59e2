//! Train, evaluate and persist an [`Agent`].
mod config;
mod kind;
use crate::{
    error::SummitError,
    record::{Record, RecordValue, Recorder},
    util::rollout,
    Agent, Obs, VecEnv,
};
use anyhow::Result;
use chrono::Local;
pub use config::ExperimentConfig;
pub use kind::OptimizerKind;
use log::info;
use std::path::PathBuf;

/// The number of steps of the evaluation rollout.
pub const EVAL_HORIZON: usize = 1000;

/// Phases of an [`Experiment`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Environment and agent are constructed.
    Configured,

    /// The agent is being trained.
    Training,

    /// The trained policy is being evaluated.
    Evaluating,

    /// The policy has been saved. Terminal.
    Persisted,
}

impl Phase {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Configured => "configured",
            Self::Training => "training",
            Self::Evaluating => "evaluating",
            Self::Persisted => "persisted",
        }
    }
}

/// Summary of a finished [`Experiment`].
#[derive(Clone, Debug)]
pub struct ExperimentReport<O> {
    /// The optimizer variant which was trained.
    pub kind: OptimizerKind,

    /// Observations of the environments right after training.
    pub state_after_training: Vec<O>,

    /// Observations of the environments at the end of the evaluation rollout.
    pub state_after_evaluation: Vec<O>,

    /// The number of steps of the evaluation rollout.
    pub eval_steps: usize,

    /// Sum of the rewards of the evaluation rollout.
    pub eval_return: f64,

    /// Where the policy was saved.
    pub model_path: PathBuf,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Runs an experiment: training, evaluation and persistence of an agent.
///
/// # Phases
///
/// ```mermaid
/// graph LR
///     A[Configured] -->|"Agent::improve(max_timesteps)"| B[Training]
///     B -->|"EVAL_HORIZON steps"| C[Evaluating]
///     C -->|"Agent::persist(model_path)"| D[Persisted]
/// ```
///
/// 1. `Configured`: [`Experiment::build`] resolves the optimizer variant of the
///    configuration and builds the agent with it. An unknown variant is a
///    [`SummitError::Configuration`] raised before the environment is touched.
/// 2. `Training`: [`Agent::improve`] is called once with the training budget
///    `max_timesteps`. The state of the environment afterwards is logged.
/// 3. `Evaluating`: the agent is switched to evaluation mode, the environment
///    is reset and [`EVAL_HORIZON`] steps are taken, each action being chosen
///    by the agent from the latest observation.
/// 4. `Persisted`: [`Agent::persist`] is called once with `model_path`.
///
/// Phases run strictly in this order and nothing is retried. Any error
/// aborts the run, in which case no policy is saved.
pub struct Experiment<V, A>
where
    V: VecEnv,
    A: Agent<V>,
{
    config: ExperimentConfig,
    kind: OptimizerKind,
    env: V,
    agent: A,
    phase: Phase,
}

impl<V, A> Experiment<V, A>
where
    V: VecEnv,
    A: Agent<V>,
{
    /// Builds an experiment.
    ///
    /// `build_agent` receives the resolved optimizer variant and is only called
    /// if the configuration is valid.
    pub fn build<F>(config: ExperimentConfig, env: V, build_agent: F) -> Result<Self>
    where
        F: FnOnce(OptimizerKind) -> Result<A>,
    {
        let kind = config.validate()?;
        let agent = build_agent(kind)?;
        info!(
            "Configured {} agent, {} training steps",
            kind, config.max_timesteps
        );

        Ok(Self {
            config,
            kind,
            env,
            agent,
            phase: Phase::Configured,
        })
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The configuration.
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// The environment.
    pub fn env(&self) -> &V {
        &self.env
    }

    /// The agent.
    pub fn agent(&self) -> &A {
        &self.agent
    }

    fn enter(&mut self, phase: Phase, recorder: &mut dyn Recorder) {
        self.phase = phase;
        recorder.write(Record::from_slice(&[
            ("phase", RecordValue::String(phase.as_str().to_string())),
            ("datetime", RecordValue::DateTime(Local::now())),
        ]));
    }

    fn check_finite(&self, obs: &[V::Obs], when: &str) -> Result<()> {
        if self.config.check_finite && obs.iter().any(|o| !o.is_finite()) {
            return Err(SummitError::NumericDegeneracy(format!(
                "non-finite state {:?} {}",
                obs, when
            ))
            .into());
        }
        Ok(())
    }

    fn train(&mut self, recorder: &mut dyn Recorder) -> Result<Vec<V::Obs>> {
        self.enter(Phase::Training, recorder);
        self.agent.train();
        self.agent
            .improve(&mut self.env, self.config.max_timesteps, recorder)?;

        let state = self.env.observe();
        info!("Final values of the parameters: {:?}", state);
        self.check_finite(&state, "after training")?;
        Ok(state)
    }

    fn evaluate(&mut self, recorder: &mut dyn Recorder) -> Result<(Vec<V::Obs>, f64)> {
        self.enter(Phase::Evaluating, recorder);
        self.agent.eval();
        let rewards = rollout(&mut self.env, &mut self.agent, EVAL_HORIZON, recorder)?;
        let eval_return = rewards.iter().sum::<f64>();

        let state = self.env.observe();
        info!(
            "Evaluation: {} steps, return = {}, final state = {:?}",
            rewards.len(),
            eval_return,
            state
        );
        self.check_finite(&state, "after evaluation")?;
        recorder.write(Record::from_slice(&[
            ("env_steps", RecordValue::Scalar(self.config.max_timesteps as f32)),
            ("eval_return", RecordValue::Scalar(eval_return as f32)),
        ]));
        Ok((state, eval_return))
    }

    fn persist(&mut self, recorder: &mut dyn Recorder) -> Result<PathBuf> {
        let path = PathBuf::from(&self.config.model_path);
        self.agent.persist(&path)?;
        info!("Saved the model in {:?}", &path);
        self.enter(Phase::Persisted, recorder);
        Ok(path)
    }

    /// Runs the training, evaluation and persistence phases.
    ///
    /// Can be called once. Calling it again is an error.
    pub fn run(&mut self, recorder: &mut dyn Recorder) -> Result<ExperimentReport<V::Obs>> {
        if self.phase != Phase::Configured {
            return Err(SummitError::Configuration(format!(
                "the experiment cannot run in phase {:?}",
                self.phase
            ))
            .into());
        }

        let state_after_training = self.train(recorder)?;
        let (state_after_evaluation, eval_return) = self.evaluate(recorder)?;
        let model_path = self.persist(recorder)?;
        recorder.flush();

        Ok(ExperimentReport {
            kind: self.kind,
            state_after_training,
            state_after_evaluation,
            eval_steps: EVAL_HORIZON,
            eval_return,
            model_path,
        })
    }
}
