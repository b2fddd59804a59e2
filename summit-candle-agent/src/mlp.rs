//! Multilayer perceptron.
mod base;
mod config;
use anyhow::Result;
pub use base::Mlp;
use candle_core::Tensor;
use candle_nn::{Linear, Module};
pub use config::{Activation, MlpConfig};

fn mlp_forward(xs: Tensor, layers: &[Linear], activation: &Activation) -> Result<Tensor> {
    let n_layers = layers.len();
    let mut xs = xs;

    for layer in &layers[..n_layers - 1] {
        xs = activation.forward(&layer.forward(&xs)?)?;
    }

    Ok(layers[n_layers - 1].forward(&xs)?)
}
