//! Checkpointing Schemes.
//!
//! Implements the policies that decide when the core runs on harvested
//! energy and when its architectural state is saved.
//!
//! # Schemes
//!
//! - `Baseline`: Idealized always-on reference with an effectively
//!   unbounded battery.
//! - `Periodic`: Realistic policy that backs up every N instructions and
//!   gates activity on the battery's charge level.

/// Idealized always-on reference scheme.
pub mod baseline;

/// Periodic instruction-count checkpointing scheme.
pub mod periodic;

pub use baseline::BaselineScheme;
pub use periodic::PeriodicScheme;

use crate::config::{Config, SchemeKind};
use crate::core::CpuState;
use crate::power::Capacitor;
use crate::stats::{ActivePeriodStats, StatsBundle};

/// Energy drawn by one retired instruction, in joules.
pub(crate) const INSTRUCTION_ENERGY: f64 = 1.2e-9;

/// Words captured by an architectural snapshot: sixteen registers, the
/// packed status word, and the two control masks.
pub(crate) const SNAPSHOT_WORDS: u64 = 19;

/// Trait for checkpointing policies.
///
/// Defines the interface the simulation loop uses to drive a scheme:
/// energy accounting per instruction, the on/off decision, and the
/// backup/restore of architectural state. The scheme owns the battery
/// and the single snapshot slot.
pub trait CheckpointScheme {
    /// The battery backing this scheme.
    fn battery(&self) -> &Capacitor;

    /// Mutable access to the battery, used by the loop to harvest into it.
    fn battery_mut(&mut self) -> &mut Capacitor;

    /// Core clock frequency in hertz under this scheme.
    fn clock_frequency(&self) -> u32;

    /// Accounts the energy of one just-retired instruction.
    ///
    /// Draws from the battery and books the draw against the open
    /// active period.
    ///
    /// # Arguments
    ///
    /// * `stats` - Run statistics; the open period record is charged.
    fn execute_instruction(&mut self, stats: &mut StatsBundle);

    /// Decides whether the core runs this tick.
    ///
    /// Takes `&mut self` so an implementation can keep on/off
    /// hysteresis state between calls.
    ///
    /// # Arguments
    ///
    /// * `stats` - Run statistics up to this tick.
    fn is_active(&mut self, stats: &StatsBundle) -> bool;

    /// Decides whether to back up after the current instruction.
    ///
    /// # Arguments
    ///
    /// * `stats` - Run statistics including the just-retired instruction.
    fn will_backup(&self, stats: &StatsBundle) -> bool;

    /// Saves an architectural snapshot.
    ///
    /// # Arguments
    ///
    /// * `cpu`   - State to snapshot.
    /// * `stats` - Run statistics; the open period is charged and its
    ///   backup count bumped.
    ///
    /// # Returns
    ///
    /// Cycles the backup occupied the system for.
    fn backup(&mut self, cpu: &CpuState, stats: &mut StatsBundle) -> u64;

    /// Reinstates the last snapshot at power-on.
    ///
    /// Restoring before any backup exists is a no-op at zero cost: the
    /// scheme has nothing to reinstate.
    ///
    /// # Arguments
    ///
    /// * `cpu`   - State to overwrite with the snapshot.
    /// * `stats` - Run statistics; the open period is charged.
    ///
    /// # Returns
    ///
    /// Cycles the restore occupied the system for.
    fn restore(&mut self, cpu: &mut CpuState, stats: &mut StatsBundle) -> u64;

    /// The scheme's own estimate of a finalized period's progress ratio.
    ///
    /// Compared against the measured `progress` to judge how well the
    /// scheme understands its energy environment.
    ///
    /// # Arguments
    ///
    /// * `period` - A finalized active-period record.
    fn estimate_progress(&self, period: &ActivePeriodStats) -> f64;
}

/// Builds the configured checkpointing scheme.
///
/// # Arguments
///
/// * `config` - Scheme selection plus the battery and clock parameters.
///
/// # Returns
///
/// The scheme as a trait object ready to drive a run.
#[must_use]
pub fn build_scheme(config: &Config) -> Box<dyn CheckpointScheme> {
    match config.scheme.kind {
        SchemeKind::Baseline => Box::new(BaselineScheme::new(config)),
        SchemeKind::Periodic => Box::new(PeriodicScheme::new(config)),
    }
}
