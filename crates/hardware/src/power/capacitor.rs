//! Energy-storage capacitor model.
//!
//! This module models the storage capacitor buffering harvested energy
//! between the supply and the core. It provides:
//! 1. **Charge accounting:** joule-level tracking of stored energy with a
//!    hard ceiling derived from the rated voltage.
//! 2. **Clamped transfer:** harvest and consume operations that report how
//!    much energy actually moved, so callers can keep exact books.

/// Energy held by a capacitance charged to a voltage, in joules.
///
/// The `E = C * V^2 / 2` law. Also used to derive the storage ceiling
/// from the rated voltage.
#[must_use]
pub const fn charge_energy(voltage: f64, capacitance: f64) -> f64 {
    0.5 * capacitance * voltage * voltage
}

/// A storage capacitor with a hard energy ceiling.
///
/// The capacitor never rejects a transfer outright; it accepts or yields
/// as much as its charge state allows and returns the amount that moved.
#[derive(Debug, Clone, Copy)]
pub struct Capacitor {
    /// Capacitance in farads.
    capacitance: f64,

    /// Energy currently stored, in joules.
    stored: f64,

    /// Storage ceiling, in joules.
    max_stored: f64,
}

impl Capacitor {
    /// Creates an empty capacitor.
    ///
    /// # Arguments
    ///
    /// * `capacitance`    - Capacitance in farads.
    /// * `voltage_rating` - Maximum sustained voltage in volts.
    #[must_use]
    pub const fn new(capacitance: f64, voltage_rating: f64) -> Self {
        Self {
            capacitance,
            stored: 0.0,
            max_stored: charge_energy(voltage_rating, capacitance),
        }
    }

    /// Creates a capacitor charged to its rating.
    #[must_use]
    pub const fn full(capacitance: f64, voltage_rating: f64) -> Self {
        let mut cap = Self::new(capacitance, voltage_rating);
        cap.stored = cap.max_stored;
        cap
    }

    /// Accepts harvested energy up to the remaining headroom.
    ///
    /// # Arguments
    ///
    /// * `offered` - Energy on offer for this window, in joules.
    ///
    /// # Returns
    ///
    /// The energy actually accepted. Anything beyond the ceiling is lost
    /// to the environment, not banked.
    pub fn harvest_energy(&mut self, offered: f64) -> f64 {
        let accepted = offered.min(self.max_stored - self.stored).max(0.0);
        self.stored += accepted;
        accepted
    }

    /// Draws energy from the store, clamped at empty.
    ///
    /// # Arguments
    ///
    /// * `amount` - Energy requested, in joules.
    ///
    /// # Returns
    ///
    /// The energy actually drawn.
    pub fn consume(&mut self, amount: f64) -> f64 {
        let drawn = amount.min(self.stored).max(0.0);
        self.stored -= drawn;
        drawn
    }

    /// Energy currently stored, in joules.
    #[must_use]
    pub const fn energy_stored(&self) -> f64 {
        self.stored
    }

    /// Capacitance in farads.
    #[must_use]
    pub const fn capacitance(&self) -> f64 {
        self.capacitance
    }

    /// Storage ceiling, in joules.
    #[must_use]
    pub const fn max_energy(&self) -> f64 {
        self.max_stored
    }
}
