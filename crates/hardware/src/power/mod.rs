//! Power supply modeling.
//!
//! Everything on the energy side of the simulation: the storage
//! capacitor that buffers harvested charge and the recorded voltage
//! trace that drives the harvesting rate.

pub mod capacitor;
pub mod trace;

pub use capacitor::{Capacitor, charge_energy};
pub use trace::VoltageTrace;
