//! Gaussian actor-critic shared by the on-policy agents.
mod base;
mod config;
pub use base::ActorCritic;
pub use config::ActorCriticConfig;
