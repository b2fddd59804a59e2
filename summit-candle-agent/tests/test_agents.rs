use anyhow::Result;
use summit_candle_agent::{
    a2c::{A2c, A2cConfig},
    actor_critic::ActorCriticConfig,
    ppo::{Ppo, PpoConfig},
    AgentConfig, CandleAgent,
};
use summit_core::{
    env::PeakEnv,
    error::SummitError,
    record::{BufferedRecorder, NullRecorder},
    vec_env::DummyVecEnv,
    Agent, Experiment, ExperimentConfig, OptimizerKind, Phase, Policy, Vec2, VecEnv, VecStep,
    EVAL_HORIZON,
};
use tempdir::TempDir;

/// Adapter counting the interactions made through it.
struct CountingEnv {
    inner: DummyVecEnv<PeakEnv>,
    n_steps: usize,
}

impl CountingEnv {
    fn new(initial_state: Vec2) -> Self {
        Self {
            inner: DummyVecEnv::new(PeakEnv::new(initial_state)),
            n_steps: 0,
        }
    }
}

impl VecEnv for CountingEnv {
    type Obs = Vec2;
    type Act = Vec2;
    type Info = ();

    fn n_envs(&self) -> usize {
        self.inner.n_envs()
    }

    fn reset(&mut self) -> Result<Vec<Vec2>> {
        self.inner.reset()
    }

    fn step(&mut self, acts: &[Vec2]) -> VecStep<Self> {
        self.n_steps += 1;
        let (obs, reward, is_done, info) = self.inner.step(acts).into_tuple();
        VecStep {
            obs,
            reward,
            is_done,
            info,
        }
    }

    fn observe(&self) -> Vec<Vec2> {
        self.inner.observe()
    }
}

fn small_model() -> ActorCriticConfig {
    AgentConfig::from_kind(OptimizerKind::Ppo, 2, 2)
        .model_config()
        .clone()
        .units(vec![16, 16])
}

fn ppo_config() -> PpoConfig {
    PpoConfig::default()
        .model_config(small_model())
        .n_steps(32)
        .batch_size(16)
        .n_epochs(2)
        .verbose(false)
        .seed(42)
}

#[test]
fn test_ppo_consumes_exact_budget() -> Result<()> {
    let mut env = CountingEnv::new(Vec2::zeros());
    let mut agent = Ppo::<CountingEnv>::build(ppo_config())?;
    let mut recorder = BufferedRecorder::new();

    agent.train();
    agent.improve(&mut env, 100, &mut recorder)?;

    // 32 + 32 + 32 + 4
    assert_eq!(env.n_steps, 100);
    assert_eq!(recorder.len(), 4);

    let env_steps = recorder
        .iter()
        .map(|r| r.get_scalar("env_steps"))
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(env_steps, vec![32.0, 64.0, 96.0, 100.0]);

    for record in recorder.iter() {
        assert!(record.get_scalar("loss_value")?.is_finite());
        assert!(record.get_scalar("approx_kl")?.is_finite());
        let clip_fraction = record.get_scalar("clip_fraction")?;
        assert!((0.0..=1.0).contains(&clip_fraction));
    }
    Ok(())
}

#[test]
fn test_a2c_consumes_exact_budget() -> Result<()> {
    let config = A2cConfig::default()
        .model_config(small_model())
        .verbose(false)
        .seed(42);
    let mut env = CountingEnv::new(Vec2::zeros());
    let mut agent = A2c::<CountingEnv>::build(config)?;
    let mut recorder = BufferedRecorder::new();

    agent.train();
    agent.improve(&mut env, 23, &mut recorder)?;

    // four rollouts of 5 steps and one of 3
    assert_eq!(env.n_steps, 23);
    assert_eq!(recorder.len(), 5);
    Ok(())
}

#[test]
fn test_sampled_actions_are_bounded() -> Result<()> {
    let mut agent = Ppo::<CountingEnv>::build(ppo_config())?;
    let obs = Vec2::new(0.5, -0.5);

    agent.train();
    for _ in 0..50 {
        let act = agent.sample(&obs);
        assert!(act.x.abs() <= 1.0 && act.y.abs() <= 1.0);
    }

    agent.eval();
    assert_eq!(agent.sample(&obs), agent.sample(&obs));
    Ok(())
}

#[test]
fn test_persist_and_load() -> Result<()> {
    let dir = TempDir::new("summit_candle_agent")?;
    let obs = Vec2::new(0.3, 0.1);

    for config in [
        AgentConfig::Ppo(ppo_config()),
        AgentConfig::A2c(A2cConfig::default().model_config(small_model()).verbose(false)),
    ] {
        let kind = config.kind();
        let path = dir.path().join(kind.tag());
        let mut agent = CandleAgent::<CountingEnv>::build(config)?;
        agent.eval();
        agent.persist(&path)?;

        let mut loaded = CandleAgent::<CountingEnv>::load(&path)?;
        loaded.eval();
        assert_eq!(loaded.kind(), kind);
        assert_eq!(agent.sample(&obs), loaded.sample(&obs));
    }

    assert!(CandleAgent::<CountingEnv>::load(dir.path()).is_err());
    Ok(())
}

#[test]
fn test_experiment_end_to_end() -> Result<()> {
    let dir = TempDir::new("summit_experiment")?;
    let model_path = dir.path().join("agent_model");
    let config = ExperimentConfig::default()
        .model("ppo")
        .max_timesteps(100)
        .initial_state(Vec2::zeros())
        .model_path(model_path.to_string_lossy());

    let mut experiment = Experiment::build(config, CountingEnv::new(Vec2::zeros()), |kind| {
        assert_eq!(kind, OptimizerKind::Ppo);
        CandleAgent::<CountingEnv>::build(AgentConfig::Ppo(ppo_config()))
    })?;
    let report = experiment.run(&mut NullRecorder::new())?;

    assert_eq!(experiment.phase(), Phase::Persisted);
    assert_eq!(experiment.env().n_steps, 100 + EVAL_HORIZON);
    assert_eq!(report.eval_steps, EVAL_HORIZON);
    assert!(report.eval_return.is_finite());
    assert!(model_path.join("actor_critic.safetensors").exists());
    assert!(model_path.join("ppo.yaml").exists());
    Ok(())
}

#[test]
fn test_zero_sized_rollouts_are_rejected() {
    let configuration_error = |res: Result<()>| match res {
        Err(e) => matches!(
            e.downcast_ref::<SummitError>(),
            Some(SummitError::Configuration(_))
        ),
        Ok(()) => false,
    };

    let ppo = Ppo::<CountingEnv>::build(ppo_config().batch_size(0)).map(|_| ());
    assert!(configuration_error(ppo));
    let ppo = Ppo::<CountingEnv>::build(ppo_config().n_steps(0)).map(|_| ());
    assert!(configuration_error(ppo));
    let a2c = A2c::<CountingEnv>::build(A2cConfig::default().n_steps(0)).map(|_| ());
    assert!(configuration_error(a2c));
}
