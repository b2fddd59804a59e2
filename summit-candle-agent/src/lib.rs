//! Policy-gradient agents implemented with [candle](https://crates.io/crates/candle-core).
//!
//! Two on-policy actor-critic algorithms are provided, [`ppo::Ppo`] and
//! [`a2c::A2c`]. Both share the Gaussian [`actor_critic::ActorCritic`] model
//! and the [`rollout::RolloutBuffer`]. [`CandleAgent`] is the closed set of
//! both, built from an [`AgentConfig`].
pub mod a2c;
pub mod actor_critic;
mod agent;
pub mod mlp;
pub mod model;
pub mod opt;
pub mod ppo;
pub mod rollout;
pub mod util;
use anyhow::Result;
pub use agent::{AgentConfig, CandleAgent};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// The main GPU device.
    Cuda(usize),
}

impl Default for Device {
    fn default() -> Self {
        Self::Cpu
    }
}

impl TryFrom<Device> for candle_core::Device {
    type Error = anyhow::Error;

    fn try_from(device: Device) -> Result<Self> {
        match device {
            Device::Cpu => Ok(candle_core::Device::Cpu),
            Device::Cuda(n) => Ok(candle_core::Device::new_cuda(n)?),
        }
    }
}
