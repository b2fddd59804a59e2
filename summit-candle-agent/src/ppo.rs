//! Proximal policy optimization (PPO) agent.
mod base;
mod config;
pub use base::Ppo;
pub use config::PpoConfig;
