//! The function-maximization environment.
//!
//! [`PeakEnv`] is a point moving on the plane. Each action is a displacement
//! added to the current position and the reward is the value of [`reward`]
//! at the new position, which has its maximum near `(1, -1)`.
mod peak;
mod reward;
pub use peak::{PeakEnv, PeakEnvConfig};
pub use reward::reward;
