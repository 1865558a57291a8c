//! Forward-progress detection in the simulation loop.
//!
//! A scripted scheme drives the loop through exact power cycles: active
//! for one instruction, then off, closing one period per pair of ticks.
//! Whether the run lives or dies then depends only on whether those
//! periods back anything up.

use ehsim_core::common::SimError;
use ehsim_core::common::constants::FORWARD_PROGRESS_THRESHOLD;
use ehsim_core::core::CpuState;
use ehsim_core::power::{Capacitor, VoltageTrace};
use ehsim_core::scheme::CheckpointScheme;
use ehsim_core::sim::Simulator;
use ehsim_core::stats::{ActivePeriodStats, StatsBundle};

use crate::common::ImageBuilder;

/// Alternates one active tick with one inactive tick, backing up after
/// every instruction or never.
struct ScriptedScheme {
    battery: Capacitor,
    ticks: u32,
    backs_up: bool,
    snapshot: Option<CpuState>,
}

impl ScriptedScheme {
    fn new(backs_up: bool) -> Self {
        Self {
            battery: Capacitor::full(100e-6, 3.3),
            ticks: 0,
            backs_up,
            snapshot: None,
        }
    }
}

impl CheckpointScheme for ScriptedScheme {
    fn battery(&self) -> &Capacitor {
        &self.battery
    }

    fn battery_mut(&mut self) -> &mut Capacitor {
        &mut self.battery
    }

    fn clock_frequency(&self) -> u32 {
        24_000_000
    }

    fn execute_instruction(&mut self, _stats: &mut StatsBundle) {}

    fn is_active(&mut self, _stats: &StatsBundle) -> bool {
        self.ticks += 1;
        self.ticks % 2 == 1
    }

    fn will_backup(&self, _stats: &StatsBundle) -> bool {
        self.backs_up
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
        0.0
    }
}

fn run_with(scheme: ScriptedScheme, image: &[u8]) -> Result<StatsBundle, SimError> {
    let trace = VoltageTrace::constant(3.3, 1e-3);
    Simulator::new(image, trace, Box::new(scheme), false)?.run()
}

#[test]
fn five_silent_periods_abort_the_run() {
    // Branch-to-self: the program would run forever; the liveness guard
    // has to be what ends it.
    let image = ImageBuilder::new().b(-4).build();

    let err = run_with(ScriptedScheme::new(false), &image).unwrap_err();

    let SimError::NoForwardProgress { periods } = err else {
        panic!("expected a liveness abort, got: {err}");
    };
    assert_eq!(periods, FORWARD_PROGRESS_THRESHOLD);
}

#[test]
fn a_backup_per_period_keeps_the_run_alive() {
    let image = ImageBuilder::new()
        .mov_imm(1, 1)
        .mov_imm(2, 2)
        .mov_imm(3, 3)
        .exit()
        .build();

    let stats = run_with(ScriptedScheme::new(true), &image).unwrap();

    // One instruction per active period, one period per record.
    assert_eq!(stats.cpu.instruction_count, 4);
    assert_eq!(stats.models.len(), 4);
    assert!(stats.models.iter().all(|p| p.num_backups == 1));
}
