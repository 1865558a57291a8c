//! Periodic instruction-count checkpointing scheme.
//!
//! A realistic intermittent-computing policy. The core powers on once the
//! battery is nearly full, executes while booking per-instruction energy,
//! saves an architectural snapshot to nonvolatile memory every N retired
//! instructions, and powers off when the battery can no longer fund a
//! backup. Work since the last backup is lost on power-off; only saved
//! work counts as forward progress.

use crate::config::Config;
use crate::core::CpuState;
use crate::power::Capacitor;
use crate::scheme::{CheckpointScheme, INSTRUCTION_ENERGY, SNAPSHOT_WORDS};
use crate::stats::{ActivePeriodStats, StatsBundle};

/// Nonvolatile write cost per snapshot word, in cycles.
const NVM_WRITE_CYCLES_PER_WORD: u64 = 4;

/// Nonvolatile read cost per snapshot word, in cycles.
const NVM_READ_CYCLES_PER_WORD: u64 = 2;

/// Nonvolatile write energy per snapshot word, in joules.
const NVM_WRITE_ENERGY_PER_WORD: f64 = 4.0e-9;

/// Nonvolatile read energy per snapshot word, in joules.
const NVM_READ_ENERGY_PER_WORD: f64 = 1.5e-9;

/// Charge fraction at which the core powers on.
///
/// Below full to avoid waiting on the asymptotic tail of the charge
/// curve; high enough for a useful run before the next power-off.
const TURN_ON_FRACTION: f64 = 0.95;

/// The periodic checkpointing scheme.
#[derive(Debug)]
pub struct PeriodicScheme {
    battery: Capacitor,
    clock_frequency: u32,
    backup_interval: u64,
    last_backup_instruction: u64,
    snapshot: Option<CpuState>,
    active: bool,
}

impl PeriodicScheme {
    /// Creates the periodic scheme from a run configuration.
    ///
    /// The battery starts empty; the first active period begins only
    /// after the environment has charged it past the turn-on threshold.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            battery: Capacitor::new(config.power.capacitance, config.power.voltage_rating),
            clock_frequency: config.general.clock_frequency,
            backup_interval: config.scheme.backup_interval,
            last_backup_instruction: 0,
            snapshot: None,
            active: false,
        }
    }

    /// Energy one backup draws, in joules.
    #[must_use]
    pub const fn backup_energy() -> f64 {
        SNAPSHOT_WORDS as f64 * NVM_WRITE_ENERGY_PER_WORD
    }

    /// Energy one restore draws, in joules.
    #[must_use]
    pub const fn restore_energy() -> f64 {
        SNAPSHOT_WORDS as f64 * NVM_READ_ENERGY_PER_WORD
    }
}

impl CheckpointScheme for PeriodicScheme {
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
        let stored = self.battery.energy_stored();
        if stored >= TURN_ON_FRACTION * self.battery.max_energy() {
            self.active = true;
        } else if stored < Self::backup_energy() {
            self.active = false;
        }
        self.active
    }

    fn will_backup(&self, stats: &StatsBundle) -> bool {
        stats
            .cpu
            .instruction_count
            .saturating_sub(self.last_backup_instruction)
            >= self.backup_interval
    }

    fn backup(&mut self, cpu: &CpuState, stats: &mut StatsBundle) -> u64 {
        self.snapshot = Some(cpu.clone());
        self.last_backup_instruction = stats.cpu.instruction_count;

        let drawn = self.battery.consume(Self::backup_energy());
        let period = stats.current_period_mut();
        period.energy_for_backups += drawn;
        period.num_backups += 1;

        SNAPSHOT_WORDS * NVM_WRITE_CYCLES_PER_WORD
    }

    fn restore(&mut self, cpu: &mut CpuState, stats: &mut StatsBundle) -> u64 {
        let Some(snapshot) = &self.snapshot else {
            return 0;
        };
        *cpu = snapshot.clone();

        let drawn = self.battery.consume(Self::restore_energy());
        stats.current_period_mut().energy_for_restore += drawn;

        SNAPSHOT_WORDS * NVM_READ_CYCLES_PER_WORD
    }

    fn estimate_progress(&self, period: &ActivePeriodStats) -> f64 {
        if period.energy_total <= 0.0 {
            return 0.0;
        }
        // The scheme believes every backup preserved one full interval.
        let believed_saved = period.num_backups as f64
            * self.backup_interval as f64
            * INSTRUCTION_ENERGY;
        believed_saved / period.energy_total
    }
}
