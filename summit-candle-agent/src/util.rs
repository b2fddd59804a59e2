//! Utilities.
use anyhow::Result;
use candle_core::{Device, Tensor, D};

const LN_2PI: f64 = 1.837_877_066_409_345_5;

/// Log density of a diagonal Gaussian, summed over the last dimension.
///
/// `x` and `mean` have shape `[batch, act_dim]`, `log_std` has shape `[act_dim]`.
/// The returned tensor has shape `[batch]`.
pub fn gaussian_logp(x: &Tensor, mean: &Tensor, log_std: &Tensor) -> Result<Tensor> {
    let std = log_std.exp()?;
    let z = x.broadcast_sub(mean)?.broadcast_div(&std)?;
    let logp = ((z.sqr()? * -0.5)?.broadcast_sub(log_std)? - 0.5 * LN_2PI)?;
    Ok(logp.sum(D::Minus1)?)
}

/// Entropy of a diagonal Gaussian, a scalar tensor.
pub fn gaussian_entropy(log_std: &Tensor) -> Result<Tensor> {
    Ok((log_std + 0.5 * (1.0 + LN_2PI))?.sum_all()?)
}

/// Normalizes a 1-dimensional tensor to zero mean and unit standard deviation.
pub fn normalize(xs: &Tensor) -> Result<Tensor> {
    let v = xs.to_vec1::<f32>()?;
    let n = v.len() as f32;
    let mean = v.iter().sum::<f32>() / n;
    let var = v.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / (n - 1.0).max(1.0);
    Ok(((xs - mean as f64)? / (var.sqrt() as f64 + 1e-8))?)
}

/// Samples `n` values from the standard normal distribution (Box-Muller).
pub fn randn(rng: &mut fastrand::Rng, n: usize) -> Vec<f32> {
    (0..n)
        .map(|_| {
            // 1 - u keeps the argument of ln() in (0, 1]
            let u1 = 1.0 - rng.f64();
            let u2 = rng.f64();
            ((-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()) as f32
        })
        .collect()
}

/// Stacks observations into a tensor of shape `[n, dim]`.
pub fn obs_to_tensor<O>(obs: &[O], device: &Device) -> Result<Tensor>
where
    O: Clone + Into<Vec<f32>>,
{
    let n = obs.len();
    let data = obs
        .iter()
        .flat_map(|o| o.clone().into())
        .collect::<Vec<f32>>();
    let dim = if n == 0 { 0 } else { data.len() / n };
    Ok(Tensor::from_vec(data, (n, dim), device)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use summit_core::Vec2;

    #[test]
    fn test_gaussian_logp_standard_normal() -> Result<()> {
        let x = Tensor::new(&[[0f32, 0f32], [1f32, 0f32]], &Device::Cpu)?;
        let mean = Tensor::zeros((2, 2), candle_core::DType::F32, &Device::Cpu)?;
        let log_std = Tensor::zeros(2, candle_core::DType::F32, &Device::Cpu)?;
        let logp = gaussian_logp(&x, &mean, &log_std)?.to_vec1::<f32>()?;

        let expected0 = -(LN_2PI as f32);
        assert!((logp[0] - expected0).abs() < 1e-5);
        assert!((logp[1] - (expected0 - 0.5)).abs() < 1e-5);
        Ok(())
    }

    #[test]
    fn test_gaussian_entropy() -> Result<()> {
        let log_std = Tensor::new(&[0f32, 1f32], &Device::Cpu)?;
        let h = gaussian_entropy(&log_std)?.to_scalar::<f32>()?;
        let expected = (1.0 + LN_2PI) as f32 + 1.0;
        assert!((h - expected).abs() < 1e-5);
        Ok(())
    }

    #[test]
    fn test_normalize() -> Result<()> {
        let xs = Tensor::new(&[1f32, 2., 3.], &Device::Cpu)?;
        let ys = normalize(&xs)?.to_vec1::<f32>()?;
        assert!(ys[1].abs() < 1e-6);
        assert!((ys[0] + 1.0).abs() < 1e-5);
        assert!((ys[2] - 1.0).abs() < 1e-5);
        Ok(())
    }

    #[test]
    fn test_randn_moments() {
        let mut rng = fastrand::Rng::with_seed(42);
        let xs = randn(&mut rng, 20000);
        let mean = xs.iter().sum::<f32>() / xs.len() as f32;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / xs.len() as f32;
        assert!(mean.abs() < 0.05);
        assert!((var - 1.0).abs() < 0.05);
        assert!(xs.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_obs_to_tensor() -> Result<()> {
        let obs = vec![Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)];
        let t = obs_to_tensor(&obs, &Device::Cpu)?;
        assert_eq!(t.dims(), &[2, 2]);
        assert_eq!(t.to_vec2::<f32>()?, vec![vec![1., 2.], vec![3., 4.]]);
        Ok(())
    }
}
