//! Simulation statistics collection and reporting.
//!
//! This module tracks the energy and timing books for a simulation run. It provides:
//! 1. **System totals:** Simulated wall time, harvested energy, and the charge
//!    left in the battery at exit.
//! 2. **CPU totals:** Retired instructions and consumed cycles.
//! 3. **Active periods:** One record per powered-on interval with per-category
//!    energy, backup counts, and forward-progress ratios.
//!
//! The whole bundle serializes to JSON for offline analysis; the
//! human-readable report goes through [`StatsBundle::print_sections`].

use serde::Serialize;

/// Whole-run totals on the system side.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SystemStats {
    /// Simulated time elapsed, in seconds.
    pub time: f64,
    /// Energy accepted by the battery over the run, in joules.
    pub energy_harvested: f64,
    /// Energy left in the battery at exit, in joules.
    pub energy_remaining: f64,
}

/// Whole-run totals on the CPU side.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CpuStats {
    /// Instructions retired.
    pub instruction_count: u64,
    /// Cycles consumed by retired instructions.
    pub cycle_count: u64,
}

/// The books for one active period.
///
/// A record opens on each power-on edge and is finalized when the core
/// powers back off. The last record of a run that ends by program exit
/// is left open; its totals are still valid, its ratios are not.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ActivePeriodStats {
    /// Cycles the CPU spent executing during the period.
    pub time_cpu_total: u64,
    /// Energy drawn to execute instructions, in joules.
    pub energy_for_instructions: f64,
    /// Energy drawn by checkpoint backups, in joules.
    pub energy_for_backups: f64,
    /// Energy drawn restoring the checkpoint at power-on, in joules.
    pub energy_for_restore: f64,
    /// Energy the battery accepted while the period was open, in joules.
    pub energy_charged: f64,
    /// Instruction energy covered by the latest backup, in joules.
    pub energy_forward_progress: f64,
    /// CPU cycles covered by the latest backup.
    pub time_forward_progress: u64,
    /// Backups taken during the period.
    pub num_backups: u64,
    /// Finalized: all energy drawn during the period, in joules.
    pub energy_total: f64,
    /// Finalized: fraction of drawn energy that produced saved work.
    pub progress: f64,
    /// Finalized: the scheme's own estimate of `progress`.
    pub eh_progress: f64,
}

impl ActivePeriodStats {
    /// Closes the period's books.
    ///
    /// Sums the per-category draws into `energy_total` and derives the
    /// measured `progress` ratio. The scheme's estimate is filled in
    /// separately by the simulation loop.
    pub fn finalize(&mut self) {
        self.energy_total =
            self.energy_for_instructions + self.energy_for_backups + self.energy_for_restore;
        self.progress = if self.energy_total > 0.0 {
            self.energy_forward_progress / self.energy_total
        } else {
            0.0
        };
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"system"`, `"cpu"`, `"periods"`. Pass an
/// empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["system", "cpu", "periods"];

/// Every statistic collected over one simulation run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StatsBundle {
    /// System-side totals.
    pub system: SystemStats,
    /// CPU-side totals.
    pub cpu: CpuStats,
    /// One record per active period, oldest first.
    pub models: Vec<ActivePeriodStats>,
}

impl StatsBundle {
    /// Creates a bundle with the first active-period record preallocated.
    #[must_use]
    pub fn new() -> Self {
        Self {
            models: vec![ActivePeriodStats::default()],
            ..Self::default()
        }
    }

    /// The record for the currently open active period.
    #[must_use]
    pub fn current_period(&self) -> Option<&ActivePeriodStats> {
        self.models.last()
    }

    /// Mutable access to the currently open active period.
    pub fn current_period_mut(&mut self) -> &mut ActivePeriodStats {
        if self.models.is_empty() {
            self.models.push(ActivePeriodStats::default());
        }
        let last = self.models.len() - 1;
        &mut self.models[last]
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of `"system"`, `"cpu"`,
    /// or `"periods"`. Pass an empty slice to print all sections (same
    /// as `print()`).
    ///
    /// # Arguments
    ///
    /// * `sections` - Slice of section names to print, or empty for all.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);

        println!("\n==========================================================");
        println!("ENERGY-HARVESTING SIMULATION STATISTICS");
        println!("==========================================================");
        if want("system") {
            println!("sim_seconds              {:.6} s", self.system.time);
            println!("energy_harvested         {:.6e} J", self.system.energy_harvested);
            println!("energy_remaining         {:.6e} J", self.system.energy_remaining);
            println!("----------------------------------------------------------");
        }
        if want("cpu") {
            let cycles = if self.cpu.cycle_count == 0 {
                1
            } else {
                self.cpu.cycle_count
            };
            let cpi = cycles as f64 / self.cpu.instruction_count.max(1) as f64;
            println!("sim_insts                {}", self.cpu.instruction_count);
            println!("sim_cycles               {}", self.cpu.cycle_count);
            println!("sim_cpi                  {cpi:.4}");
            println!("----------------------------------------------------------");
        }
        if want("periods") {
            println!("ACTIVE PERIODS           {}", self.models.len());
            println!(
                "  {:<8} {:<10} {:<8} {:<12} {:<12} {:<10} {:<10}",
                "period", "cycles", "backups", "e_instr", "e_total", "progress", "estimate"
            );
            for (index, period) in self.models.iter().enumerate() {
                println!(
                    "  {:<8} {:<10} {:<8} {:<12.4e} {:<12.4e} {:<10.4} {:<10.4}",
                    index,
                    period.time_cpu_total,
                    period.num_backups,
                    period.energy_for_instructions,
                    period.energy_total,
                    period.progress,
                    period.eh_progress
                );
            }
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
