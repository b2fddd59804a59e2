use anyhow::Result;
use summit::{create_agent, create_recorder, default_tensorboard_dir, run};
use summit_core::{
    error::SummitError, record::BufferedRecorder, Agent, ExperimentConfig, OptimizerKind, Vec2,
    EVAL_HORIZON,
};
use tempdir::TempDir;

#[test]
fn test_run_a2c() -> Result<()> {
    let dir = TempDir::new("summit_run")?;
    let model_path = dir.path().join("agent_model");
    let config = ExperimentConfig::default()
        .model("A2C")
        .max_timesteps(50)
        .initial_state(Vec2::new(0.5, -0.5))
        .model_path(model_path.to_string_lossy())
        .seed(1);

    let mut recorder = BufferedRecorder::new();
    let report = run(config, false, &mut recorder)?;

    assert_eq!(report.kind, OptimizerKind::A2c);
    assert_eq!(report.eval_steps, EVAL_HORIZON);
    assert_eq!(report.state_after_evaluation.len(), 1);
    assert!(model_path.join("a2c.yaml").exists());

    // ten updates of five steps each
    let n_updates = recorder
        .iter()
        .filter(|r| r.get("n_updates").is_some())
        .count();
    assert_eq!(n_updates, 10);
    Ok(())
}

#[test]
fn test_run_with_largest_seed() -> Result<()> {
    let dir = TempDir::new("summit_run")?;
    let config = ExperimentConfig::default()
        .model("ppo")
        .max_timesteps(8)
        .model_path(dir.path().join("agent_model").to_string_lossy())
        .seed(u64::MAX);

    let report = run(config, false, &mut BufferedRecorder::new())?;
    assert_eq!(report.kind, OptimizerKind::Ppo);
    assert!(report.eval_return.is_finite());
    Ok(())
}

#[test]
fn test_run_rejects_unknown_model() -> Result<()> {
    let dir = TempDir::new("summit_run")?;
    let model_path = dir.path().join("agent_model");
    let config = ExperimentConfig::default()
        .model("ddpg")
        .max_timesteps(50)
        .model_path(model_path.to_string_lossy());

    let err = run(config, false, &mut BufferedRecorder::new()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SummitError>(),
        Some(SummitError::Configuration(_))
    ));
    assert!(!model_path.exists());
    Ok(())
}

#[test]
fn test_create_agent() -> Result<()> {
    for kind in [OptimizerKind::Ppo, OptimizerKind::A2c] {
        let agent = create_agent(kind, Some(0), false)?;
        assert_eq!(agent.kind(), kind);
        assert!(!agent.is_train());
    }
    Ok(())
}

#[test]
fn test_tensorboard_recorder() -> Result<()> {
    assert_eq!(
        default_tensorboard_dir(OptimizerKind::Ppo).to_string_lossy(),
        "./ppo_tensorboard"
    );

    let dir = TempDir::new("summit_tensorboard")?;
    let mut recorder = create_recorder(Some(dir.path()));
    recorder.flush();
    let mut recorder = create_recorder(None);
    recorder.flush();
    Ok(())
}
