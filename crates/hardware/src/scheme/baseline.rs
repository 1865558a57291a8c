//! Idealized baseline checkpointing scheme.
//!
//! The reference point every realistic scheme is measured against: the
//! core is always powered, nothing is ever backed up, and the battery is
//! sized so it cannot run dry over any plausible program. Runs under this
//! scheme complete in one active period with perfect progress.

use crate::config::Config;
use crate::core::CpuState;
use crate::power::Capacitor;
use crate::scheme::{CheckpointScheme, INSTRUCTION_ENERGY};
use crate::stats::{ActivePeriodStats, StatsBundle};

/// Battery capacitance standing in for "unbounded", in farads.
///
/// Nine orders of magnitude above the instruction draw; no program that
/// terminates will get near the floor.
const BASELINE_CAPACITANCE: f64 = 1.0;

/// The idealized no-op checkpointing scheme.
#[derive(Debug)]
pub struct BaselineScheme {
    battery: Capacitor,
    clock_frequency: u32,
    snapshot: Option<CpuState>,
}

impl BaselineScheme {
    /// Creates the baseline scheme from a run configuration.
    ///
    /// Only the clock frequency and voltage rating are taken from the
    /// config; the capacitance is replaced by the unbounded stand-in.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            battery: Capacitor::full(BASELINE_CAPACITANCE, config.power.voltage_rating),
            clock_frequency: config.general.clock_frequency,
            snapshot: None,
        }
    }
}

impl CheckpointScheme for BaselineScheme {
    fn battery(&self) -> &Capacitor {
        &self.battery
    }

    fn battery_mut(&mut self) -> &mut Capacitor {
        &mut self.battery
    }

    fn clock_frequency(&self) -> u32 {
        self.clock_frequency
    }

    fn execute_instruction(&mut self, stats: &mut StatsBundle) {
        let drawn = self.battery.consume(INSTRUCTION_ENERGY);
        stats.current_period_mut().energy_for_instructions += drawn;
    }

    fn is_active(&mut self, _stats: &StatsBundle) -> bool {
        true
    }

    fn will_backup(&self, _stats: &StatsBundle) -> bool {
        false
    }

    fn backup(&mut self, cpu: &CpuState, stats: &mut StatsBundle) -> u64 {
        self.snapshot = Some(cpu.clone());
        stats.current_period_mut().num_backups += 1;
        0
    }

    fn restore(&mut self, cpu: &mut CpuState, _stats: &mut StatsBundle) -> u64 {
        if let Some(snapshot) = &self.snapshot {
            *cpu = snapshot.clone();
        }
        0
    }

    fn estimate_progress(&self, _period: &ActivePeriodStats) -> f64 {
        1.0
    }
}
