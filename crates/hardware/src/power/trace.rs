//! Supply-voltage trace playback.
//!
//! This module replays a recorded harvesting environment. It provides:
//! 1. **Trace loading:** parses a text file of voltage samples, one per
//!    line, taken at a fixed sample period.
//! 2. **Time indexing:** maps simulated time to the sample in effect,
//!    holding the final sample once the recording runs out.
//!
//! Lines that are blank or start with `#` are ignored, so traces can
//! carry provenance comments from the capture tooling.

use std::fs;

use crate::common::error::SimError;

/// A supply-voltage recording sampled at a fixed period.
#[derive(Debug, Clone)]
pub struct VoltageTrace {
    /// Samples in volts, one per period, oldest first.
    samples: Vec<f64>,

    /// Seconds between consecutive samples.
    sample_period: f64,
}

impl VoltageTrace {
    /// Loads a trace from a text file of one voltage sample per line.
    ///
    /// # Arguments
    ///
    /// * `path`          - Path to the trace file.
    /// * `sample_period` - Seconds between consecutive samples.
    ///
    /// # Returns
    ///
    /// The parsed trace, or [`SimError::TraceLoad`] when the file is
    /// unreadable, holds no samples, or contains a line that does not
    /// parse as a voltage.
    pub fn from_file(path: &str, sample_period: f64) -> Result<Self, SimError> {
        let text = fs::read_to_string(path).map_err(|e| SimError::TraceLoad {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        let mut samples = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let volts = line.parse::<f64>().map_err(|e| SimError::TraceLoad {
                path: path.to_string(),
                reason: format!("line {}: {e}", index + 1),
            })?;
            samples.push(volts);
        }

        if samples.is_empty() {
            return Err(SimError::TraceLoad {
                path: path.to_string(),
                reason: "trace contains no samples".to_string(),
            });
        }

        Ok(Self {
            samples,
            sample_period,
        })
    }

    /// Builds a single-sample trace that holds one voltage forever.
    #[must_use]
    pub fn constant(volts: f64, sample_period: f64) -> Self {
        Self {
            samples: vec![volts],
            sample_period,
        }
    }

    /// Seconds between consecutive samples.
    #[must_use]
    pub const fn sample_period(&self) -> f64 {
        self.sample_period
    }

    /// Supply voltage in effect at a point in simulated time.
    ///
    /// # Arguments
    ///
    /// * `time` - Simulated time in seconds.
    ///
    /// # Returns
    ///
    /// The sample covering `time`; past the end of the recording the
    /// final sample holds.
    #[must_use]
    pub fn voltage_at(&self, time: f64) -> f64 {
        let index = (time / self.sample_period) as usize;
        self.samples[index.min(self.samples.len() - 1)]
    }
}
