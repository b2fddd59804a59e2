use super::ActorCriticConfig;
use crate::{
    mlp::Mlp,
    model::SubModel1,
    opt::{clip_grad_norm, Optimizer},
    util::{gaussian_entropy, gaussian_logp, randn},
};
use anyhow::Result;
use candle_core::{DType, Device, Tensor, D};
use candle_nn::{Init, VarBuilder, VarMap};
use log::info;
use std::{fs, path::Path};

const PARAMS_FILE: &str = "actor_critic.safetensors";

/// Actor-critic with a diagonal Gaussian policy.
///
/// The mean of the action distribution and the state value are given by two
/// separate MLPs. The log standard deviation is a state-independent parameter.
/// All parameters live in a single [`VarMap`] updated by a single optimizer.
pub struct ActorCritic {
    config: ActorCriticConfig,
    device: Device,
    varmap: VarMap,
    pi: Mlp,
    vf: Mlp,
    log_std: Tensor,
    opt: Optimizer,
}

impl ActorCritic {
    /// Constructs [`ActorCritic`].
    pub fn build(config: ActorCriticConfig, device: Device) -> Result<Self> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let pi = Mlp::build(vb.pp("pi"), config.pi_config())?;
        let vf = Mlp::build(vb.pp("vf"), config.vf_config())?;
        let log_std = vb.get_with_hints(
            config.act_dim,
            "log_std",
            Init::Const(config.log_std_init),
        )?;
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self {
            config,
            device,
            varmap,
            pi,
            vf,
            log_std,
            opt,
        })
    }

    /// The device on which the parameters reside.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// The configuration.
    pub fn config(&self) -> &ActorCriticConfig {
        &self.config
    }

    /// The log standard deviation of the action distribution.
    pub fn log_std(&self) -> &Tensor {
        &self.log_std
    }

    /// Returns the mean action, shape `[batch, act_dim]`.
    pub fn mean(&self, obs: &Tensor) -> Result<Tensor> {
        self.pi.forward(obs)
    }

    /// Returns the state value, shape `[batch]`.
    pub fn value(&self, obs: &Tensor) -> Result<Tensor> {
        Ok(self.vf.forward(obs)?.squeeze(D::Minus1)?)
    }

    /// Returns an action for a single observation, clipped to `[-bound, bound]`.
    ///
    /// The action is sampled from the policy if `rng` is given, otherwise it
    /// is the mean of the policy.
    pub fn act(&self, obs: Vec<f32>, rng: Option<&mut fastrand::Rng>, bound: f64) -> Result<Vec<f32>> {
        let obs_dim = obs.len();
        let obs = Tensor::from_vec(obs, (1, obs_dim), &self.device)?;
        let mean = self.mean(&obs)?;
        let act = match rng {
            Some(rng) => {
                let noise = Tensor::from_vec(randn(rng, self.config.act_dim), mean.dims(), &self.device)?;
                mean.add(&noise.broadcast_mul(&self.log_std.exp()?)?)?
            }
            None => mean,
        };
        let bound = bound as f32;
        Ok(act
            .flatten_all()?
            .to_vec1::<f32>()?
            .into_iter()
            .map(|a| a.clamp(-bound, bound))
            .collect())
    }

    /// Returns the state values, the log probabilities of the given actions
    /// and the entropy of the action distribution.
    pub fn evaluate_actions(&self, obs: &Tensor, act: &Tensor) -> Result<(Tensor, Tensor, Tensor)> {
        let mean = self.mean(obs)?;
        let values = self.value(obs)?;
        let logp = gaussian_logp(act, &mean, &self.log_std)?;
        let entropy = gaussian_entropy(&self.log_std)?;
        Ok((values, logp, entropy))
    }

    /// Backpropagates the loss and applies an optimization step.
    ///
    /// Returns the norm of the gradients before clipping.
    pub fn backward_step(&mut self, loss: &Tensor, max_grad_norm: f64) -> Result<f32> {
        let mut grads = loss.backward()?;
        let norm = clip_grad_norm(&self.varmap.all_vars(), &mut grads, max_grad_norm)?;
        self.opt.step(&grads)?;
        Ok(norm)
    }

    /// Saves the parameters into the given directory.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::create_dir_all(path)?;
        let path = path.join(PARAMS_FILE);
        self.varmap.save(&path)?;
        info!("Save actor-critic to {:?}", path);
        Ok(())
    }

    /// Loads the parameters from the given directory.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref().join(PARAMS_FILE);
        self.varmap.load(&path)?;
        info!("Load actor-critic from {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn model() -> Result<ActorCritic> {
        let config = ActorCriticConfig::default().units(vec![8, 8]);
        ActorCritic::build(config, Device::Cpu)
    }

    #[test]
    fn test_shapes() -> Result<()> {
        let model = model()?;
        let obs = Tensor::zeros((4, 2), DType::F32, &Device::Cpu)?;
        let act = Tensor::ones((4, 2), DType::F32, &Device::Cpu)?;
        let (values, logp, entropy) = model.evaluate_actions(&obs, &act)?;

        assert_eq!(model.mean(&obs)?.dims(), &[4, 2]);
        assert_eq!(values.dims(), &[4]);
        assert_eq!(logp.dims(), &[4]);
        assert_eq!(entropy.dims().len(), 0);
        assert_eq!(model.log_std().to_vec1::<f32>()?, vec![0f32, 0f32]);
        Ok(())
    }

    #[test]
    fn test_backward_step_updates_params() -> Result<()> {
        let mut model = model()?;
        let obs = Tensor::ones((4, 2), DType::F32, &Device::Cpu)?;
        let before = model.value(&obs)?.to_vec1::<f32>()?;

        // pull values towards a distant target
        let target = Tensor::new(&[10f32, 10., 10., 10.], &Device::Cpu)?;
        let loss = candle_nn::loss::mse(&model.value(&obs)?, &target)?;
        model.backward_step(&loss, 0.5)?;

        let after = model.value(&obs)?.to_vec1::<f32>()?;
        assert_ne!(before, after);
        Ok(())
    }

    #[test]
    fn test_act_is_clipped() -> Result<()> {
        let config = ActorCriticConfig::default().units(vec![8]).log_std_init(3.0);
        let model = ActorCritic::build(config, Device::Cpu)?;
        let mut rng = fastrand::Rng::with_seed(0);

        for _ in 0..20 {
            let act = model.act(vec![0.1, 0.2], Some(&mut rng), 1.0)?;
            assert_eq!(act.len(), 2);
            assert!(act.iter().all(|a| (-1.0..=1.0).contains(a)));
        }

        let det1 = model.act(vec![0.1, 0.2], None, 1.0)?;
        let det2 = model.act(vec![0.1, 0.2], None, 1.0)?;
        assert_eq!(det1, det2);
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let src = model()?;
        let mut dest = model()?;
        let obs = Tensor::new(&[[0.3f32, -0.7]], &Device::Cpu)?;

        let dir = TempDir::new("actor_critic")?;
        src.save(dir.path())?;
        dest.load(dir.path())?;

        assert_eq!(
            src.mean(&obs)?.to_vec2::<f32>()?,
            dest.mean(&obs)?.to_vec2::<f32>()?
        );
        Ok(())
    }
}
