//! Advantage actor-critic (A2C) agent.
mod base;
mod config;
pub use base::A2c;
pub use config::A2cConfig;
