//! Core functionalities.
mod agent;
mod env;
mod policy;
mod step;
mod vec2;
mod vec_env;
pub use agent::Agent;
pub use env::Env;
pub use policy::Policy;
use std::fmt::Debug;
pub use step::{Info, Step, VecStep};
pub use vec2::Vec2;
pub use vec_env::VecEnv;

/// Observation of an environment.
pub trait Obs: Clone + Debug {
    /// Returns `false` if the observation contains a non-finite number.
    ///
    /// Used by the [`Experiment`](crate::Experiment) driver when finiteness
    /// checks are enabled.
    fn is_finite(&self) -> bool {
        true
    }
}

/// Action of an environment.
pub trait Act: Clone + Debug {}

impl Obs for Vec2 {
    fn is_finite(&self) -> bool {
        Vec2::is_finite(self)
    }
}

impl Act for Vec2 {}
