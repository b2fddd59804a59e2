//! Tensorboard recorder for summit.
use log::warn;
use std::path::Path;
use summit_core::record::{Record, RecordValue, Recorder};
use tensorboard_rs::summary_writer::SummaryWriter;

/// Keys giving the step of a record: training progress and evaluation trace.
const STEP_KEYS: [&str; 2] = ["env_steps", "eval_step"];

/// Write records to TFRecord.
///
/// Only records having one of the step keys (`env_steps` or `eval_step`) are
/// written, as tensorboard needs a step for every value. Other records, like
/// the phase markers of an experiment, are skipped.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
        }
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [`Record`] into a TFRecord.
    ///
    /// Only [`RecordValue::Scalar`] values are written, other variants are ignored.
    fn write(&mut self, record: Record) {
        let Some((step_key, value)) = STEP_KEYS
            .iter()
            .find_map(|k| record.get(k).map(|v| (*k, v)))
        else {
            return;
        };
        let step = match value {
            RecordValue::Scalar(v) => *v as usize,
            v => {
                warn!("Step key {} has a non-scalar value {:?}", step_key, v);
                return;
            }
        };

        for (k, v) in record.iter() {
            if let RecordValue::Scalar(v) = v {
                if k != step_key {
                    self.writer.add_scalar(k, *v, step);
                }
            }
        }
    }

    fn flush(&mut self) {
        self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempdir::TempDir;

    /// Concatenated contents of the event files in `dir`.
    fn read_events(dir: &Path) -> Result<Vec<u8>> {
        let mut bytes = vec![];
        for entry in std::fs::read_dir(dir)? {
            bytes.extend(std::fs::read(entry?.path())?);
        }
        Ok(bytes)
    }

    fn contains(bytes: &[u8], tag: &str) -> bool {
        bytes.windows(tag.len()).any(|w| w == tag.as_bytes())
    }

    #[test]
    fn test_write_scalars() -> Result<()> {
        let dir = TempDir::new("tensorboard_recorder")?;
        let mut recorder = TensorboardRecorder::new(dir.path());
        recorder.write(Record::from_slice(&[
            ("env_steps", RecordValue::Scalar(2048.0)),
            ("loss_value", RecordValue::Scalar(0.5)),
        ]));
        recorder.write(Record::from_slice(&[
            ("eval_step", RecordValue::Scalar(3.0)),
            ("eval_reward", RecordValue::Scalar(-1.5)),
        ]));
        recorder.write(Record::from_slice(&[
            ("phase", RecordValue::String("training".to_string())),
            ("no_step_scalar", RecordValue::Scalar(1.0)),
        ]));
        recorder.flush();

        // the event file is written by a background thread joined on drop
        drop(recorder);

        let events = read_events(dir.path())?;
        assert!(contains(&events, "loss_value"));
        assert!(contains(&events, "eval_reward"));
        assert!(!contains(&events, "no_step_scalar"));
        assert!(!contains(&events, "training"));
        Ok(())
    }
}
