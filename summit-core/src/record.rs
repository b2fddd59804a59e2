//! Types and traits for recording diagnostics of training and evaluation.
//!
//! Agents write a [`Record`] after every policy update and the
//! [`Experiment`](crate::Experiment) driver writes one at every phase
//! transition. Where the records go is decided by the [`Recorder`] given to
//! them: nowhere ([`NullRecorder`]), into memory ([`BufferedRecorder`]), or
//! to an external backend implemented in another crate.
//!
//! ```rust
//! use summit_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("env_steps", 2048.0);
//! record.insert("loss_value", RecordValue::Scalar(0.25));
//! record.insert("obs", RecordValue::Array1(vec![0.5, -0.5]));
//! assert_eq!(record.get_scalar("loss_value").unwrap(), 0.25);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
