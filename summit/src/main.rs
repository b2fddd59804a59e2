use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use summit::{create_recorder, default_tensorboard_dir};
use summit_core::{ExperimentConfig, Vec2};

/// Train a PPO or A2C agent to maximize a two-dimensional function
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Optimizer, "ppo" or "a2c" [default: ppo]
    #[arg(long)]
    model: Option<String>,

    /// The number of environment interactions for training [default: 100000]
    #[arg(long)]
    max_timesteps: Option<usize>,

    /// Initial value of x [default: 0.0]
    #[arg(long, allow_negative_numbers = true)]
    initial_x: Option<f64>,

    /// Initial value of y [default: 0.0]
    #[arg(long, allow_negative_numbers = true)]
    initial_y: Option<f64>,

    /// YAML file of the experiment configuration, overridden by the other flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory where the trained agent is saved [default: agent_model]
    #[arg(long)]
    model_path: Option<String>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Tensorboard log directory [default: ./<model>_tensorboard]
    #[arg(long)]
    tensorboard_dir: Option<PathBuf>,

    /// Do not log training diagnostics of the agent
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

impl Args {
    fn experiment_config(&self) -> Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::load(path)?,
            None => ExperimentConfig::default(),
        };

        if let Some(model) = &self.model {
            config = config.model(model.as_str());
        }
        if let Some(max_timesteps) = self.max_timesteps {
            config = config.max_timesteps(max_timesteps);
        }
        let initial_state = Vec2::new(
            self.initial_x.unwrap_or(config.initial_state.x),
            self.initial_y.unwrap_or(config.initial_state.y),
        );
        config = config.initial_state(initial_state);
        if let Some(model_path) = &self.model_path {
            config = config.model_path(model_path.as_str());
        }
        if let Some(seed) = self.seed {
            config = config.seed(seed);
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.experiment_config()?;
    let logdir = match &args.tensorboard_dir {
        Some(dir) => dir.clone(),
        None => default_tensorboard_dir(config.validate()?),
    };
    let mut recorder = create_recorder(Some(logdir.as_path()));

    let report = summit::run(config, !args.quiet, recorder.as_mut())?;
    info!(
        "Done: {} training, evaluation return = {:.4}, saved to {:?}",
        report.kind, report.eval_return, report.model_path
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_override_config() -> Result<()> {
        let args = Args::parse_from([
            "summit",
            "--model",
            "a2c",
            "--max-timesteps",
            "500",
            "--initial-x",
            "-1.5",
            "--seed",
            "3",
        ]);
        let config = args.experiment_config()?;

        assert_eq!(config.model, "a2c");
        assert_eq!(config.max_timesteps, 500);
        assert_eq!(config.initial_state, Vec2::new(-1.5, 0.0));
        assert_eq!(config.model_path, "agent_model");
        assert_eq!(config.seed, Some(3));
        Ok(())
    }

    #[test]
    fn test_args_defaults() -> Result<()> {
        let args = Args::parse_from(["summit"]);
        assert_eq!(args.experiment_config()?, ExperimentConfig::default());
        assert!(!args.quiet);
        Ok(())
    }
}
