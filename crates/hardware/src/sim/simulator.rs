//! Energy and time co-simulation loop.
//!
//! This module drives one full run of a program under a checkpointing
//! scheme. It provides:
//! 1. **The tick loop:** Alternates between active execution and
//!    powered-off charging, as decided by the scheme each tick.
//! 2. **Co-accounting:** Converts cycles to wall time, offers harvested
//!    energy to the battery, and resamples the supply trace on its
//!    sample boundaries.
//! 3. **Liveness:** Aborts a run once too many consecutive active
//!    periods complete without a single backup, since such a run would
//!    replay the same instructions forever.

use tracing::{debug, error, info};

use crate::common::constants::FORWARD_PROGRESS_THRESHOLD;
use crate::common::error::SimError;
use crate::config::Config;
use crate::core::{CpuState, step};
use crate::mem::Memory;
use crate::power::{VoltageTrace, charge_energy};
use crate::scheme::{CheckpointScheme, build_scheme};
use crate::sim::loader;
use crate::stats::{ActivePeriodStats, StatsBundle};

/// Joules per cycle offered by the supply at a sampled voltage.
///
/// The energy of the capacitor charged to the sample, spread across one
/// sample window of cycles.
fn charging_rate(voltage: f64, capacitance: f64, cycles_per_sample: f64) -> f64 {
    charge_energy(voltage, capacitance) / cycles_per_sample
}

/// Top-level simulator: machine state, scheme, and supply side by side.
///
/// Strictly single-threaded; the loop owns the CPU and memory while the
/// scheme owns the snapshot and battery, which keeps every run
/// bit-exactly reproducible.
pub struct Simulator {
    cpu: CpuState,
    mem: Memory,
    scheme: Box<dyn CheckpointScheme>,
    trace: VoltageTrace,
    always_harvest: bool,
    stats: StatsBundle,

    /// The core executed on the previous tick.
    was_active: bool,
    /// Cycle count at the opening of the current active period.
    active_start: u64,
    /// Consecutive finalized periods without a backup.
    no_progress_count: u32,
    /// The program hit its exit sentinel.
    exit: bool,

    charging_rate: f64,
    cycles_per_sample: f64,
    next_sample_time: f64,
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("cpu", &self.cpu)
            .field("was_active", &self.was_active)
            .field("exit", &self.exit)
            .finish_non_exhaustive()
    }
}

impl Simulator {
    /// Creates a simulator over a loaded image.
    ///
    /// # Arguments
    ///
    /// * `image`          - Raw bytes of the program's flat binary.
    /// * `trace`          - Supply-voltage recording to play back.
    /// * `scheme`         - Checkpointing policy, owning the battery.
    /// * `always_harvest` - Harvest during active ticks too, not only
    ///   while powered off.
    ///
    /// # Returns
    ///
    /// The simulator ready to run, or the fault that rejected the image.
    pub fn new(
        image: &[u8],
        trace: VoltageTrace,
        scheme: Box<dyn CheckpointScheme>,
        always_harvest: bool,
    ) -> Result<Self, SimError> {
        let (cpu, mem) = loader::initialize_system(image)?;

        let cycles_per_sample = f64::from(scheme.clock_frequency()) * trace.sample_period();
        let rate = charging_rate(
            trace.voltage_at(0.0),
            scheme.battery().capacitance(),
            cycles_per_sample,
        );
        let next_sample_time = trace.sample_period();

        Ok(Self {
            cpu,
            mem,
            scheme,
            trace,
            always_harvest,
            stats: StatsBundle::new(),
            was_active: false,
            active_start: 0,
            no_progress_count: 0,
            exit: false,
            charging_rate: rate,
            cycles_per_sample,
            next_sample_time,
        })
    }

    /// Runs the program to its exit sentinel.
    ///
    /// # Returns
    ///
    /// The completed statistics bundle, or the error that ended the run:
    /// a CPU fault, or [`SimError::NoForwardProgress`] from the liveness
    /// guard.
    pub fn run(mut self) -> Result<StatsBundle, SimError> {
        info!("starting run");

        while !self.exit {
            self.tick()?;
        }

        self.stats.system.energy_remaining = self.scheme.battery().energy_stored();
        info!(
            instructions = self.stats.cpu.instruction_count,
            cycles = self.stats.cpu.cycle_count,
            seconds = self.stats.system.time,
            "run complete"
        );
        Ok(self.stats)
    }

    /// Advances the simulation by one tick.
    ///
    /// An active tick retires one instruction plus any backup the scheme
    /// asks for; an inactive tick lets one cycle of charging pass.
    fn tick(&mut self) -> Result<(), SimError> {
        let mut elapsed_cycles: u64 = 0;

        if self.scheme.is_active(&self.stats) {
            if !self.was_active {
                debug!(cycle = self.stats.cpu.cycle_count, "powering on");

                if self.stats.cpu.instruction_count != 0 {
                    self.stats.models.push(ActivePeriodStats::default());
                    elapsed_cycles += self.scheme.restore(&mut self.cpu, &mut self.stats);
                }
                self.active_start = self.stats.cpu.cycle_count;
            }
            self.was_active = true;

            let outcome = step(&mut self.cpu, &mut self.mem)?;
            self.exit = outcome.exit;

            self.stats.cpu.instruction_count += 1;
            self.stats.cpu.cycle_count += outcome.cycles;
            self.stats.current_period_mut().time_cpu_total += outcome.cycles;
            elapsed_cycles += outcome.cycles;

            self.scheme.execute_instruction(&mut self.stats);

            if self.scheme.will_backup(&self.stats) {
                elapsed_cycles += self.scheme.backup(&self.cpu, &mut self.stats);

                let covered = self.stats.cpu.cycle_count - self.active_start;
                let period = self.stats.current_period_mut();
                period.energy_forward_progress = period.energy_for_instructions;
                period.time_forward_progress = covered;
            }
        } else {
            if self.was_active {
                self.close_active_period()?;
            }
            self.was_active = false;
            elapsed_cycles = 1;
        }

        self.advance_clock(elapsed_cycles);
        Ok(())
    }

    /// Finalizes the period that just lost power.
    ///
    /// The liveness check runs first: a period that took no backup adds
    /// to the no-progress streak, and crossing the threshold aborts the
    /// run before its books are closed.
    fn close_active_period(&mut self) -> Result<(), SimError> {
        debug!(cycle = self.stats.cpu.cycle_count, "powering off");

        let backups = self.stats.current_period().map_or(0, |p| p.num_backups);
        if backups == 0 {
            self.no_progress_count += 1;
            if self.no_progress_count >= FORWARD_PROGRESS_THRESHOLD {
                error!(
                    periods = self.no_progress_count,
                    "no forward progress, aborting"
                );
                return Err(SimError::NoForwardProgress {
                    periods: self.no_progress_count,
                });
            }
        } else {
            self.no_progress_count = 0;
        }

        let period = self.stats.current_period_mut();
        period.finalize();
        let estimate = self.scheme.estimate_progress(period);
        period.eh_progress = estimate;
        Ok(())
    }

    /// Converts elapsed cycles into wall time and charging.
    ///
    /// Harvest applies on every tick when configured always-on, and on
    /// powered-off ticks regardless. Only energy the battery accepted is
    /// credited to the books. Crossing a sample boundary re-reads the
    /// trace and re-derives the charging rate.
    fn advance_clock(&mut self, elapsed_cycles: u64) {
        self.stats.system.time +=
            elapsed_cycles as f64 / f64::from(self.scheme.clock_frequency());

        if self.always_harvest || !self.was_active {
            let offered = self.charging_rate * elapsed_cycles as f64;
            let accepted = self.scheme.battery_mut().harvest_energy(offered);

            self.stats.system.energy_harvested += accepted;
            if self.was_active {
                self.stats.current_period_mut().energy_charged += accepted;
            }
        }

        if self.stats.system.time >= self.next_sample_time {
            self.next_sample_time += self.trace.sample_period();

            let voltage = self.trace.voltage_at(self.stats.system.time);
            self.charging_rate = charging_rate(
                voltage,
                self.scheme.battery().capacitance(),
                self.cycles_per_sample,
            );
            debug!(voltage, time = self.stats.system.time, "resampled supply");
        }
    }
}

/// Loads a program and runs it under the configured scheme.
///
/// # Arguments
///
/// * `image_path` - Path to the program's flat binary.
/// * `trace`      - Supply-voltage recording to play back.
/// * `config`     - Scheme selection plus battery and clock parameters.
///
/// # Returns
///
/// The completed statistics bundle, or the first error on the way.
pub fn simulate(
    image_path: &str,
    trace: VoltageTrace,
    config: &Config,
) -> Result<StatsBundle, SimError> {
    let image = loader::load_image(image_path)?;
    let scheme = build_scheme(config);
    Simulator::new(&image, trace, scheme, config.general.always_harvest)?.run()
}
