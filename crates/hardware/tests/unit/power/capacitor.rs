//! Storage-capacitor energy accounting.

use proptest::prelude::*;

use ehsim_core::power::{Capacitor, charge_energy};

const EPSILON: f64 = 1e-12;

#[test]
fn charge_energy_follows_the_capacitor_law() {
    // E = C * V^2 / 2.
    assert!((charge_energy(3.3, 100e-6) - 5.445e-4).abs() < EPSILON);
    assert!(charge_energy(0.0, 1.0).abs() < EPSILON);
    assert!((charge_energy(2.0, 0.5) - 1.0).abs() < EPSILON);
}

#[test]
fn a_new_capacitor_is_empty_and_a_full_one_is_at_its_ceiling() {
    let mut empty = Capacitor::new(100e-6, 3.3);
    assert!(empty.energy_stored().abs() < EPSILON);
    assert!(empty.consume(1.0).abs() < EPSILON);

    let mut full = Capacitor::full(100e-6, 3.3);
    assert!((full.energy_stored() - full.max_energy()).abs() < EPSILON);
    assert!(full.harvest_energy(1.0).abs() < EPSILON);
    assert!((full.max_energy() - charge_energy(3.3, 100e-6)).abs() < EPSILON);
}

proptest! {
    /// Every joule reported as moved is a joule that actually moved, and
    /// the stored charge never leaves the physical range.
    #[test]
    fn books_balance_over_any_transfer_sequence(
        ops in prop::collection::vec((any::<bool>(), 0.0f64..1e-3), 1..200),
    ) {
        let mut cap = Capacitor::new(100e-6, 3.3);
        let mut banked = 0.0;
        for (harvesting, joules) in ops {
            if harvesting {
                banked += cap.harvest_energy(joules);
            } else {
                banked -= cap.consume(joules);
            }
            prop_assert!(cap.energy_stored() >= 0.0);
            prop_assert!(cap.energy_stored() <= cap.max_energy() + EPSILON);
        }
        prop_assert!((cap.energy_stored() - banked).abs() < 1e-9);
    }

    /// Transfers report exactly what the clamp allowed.
    #[test]
    fn clamped_transfers_report_the_moved_amount(offered in 0.0f64..1e-2) {
        let mut cap = Capacitor::new(100e-6, 3.3);
        let headroom = cap.max_energy();
        let accepted = cap.harvest_energy(offered);
        prop_assert!((accepted - offered.min(headroom)).abs() < EPSILON);

        // Draining asks for more than is stored; only the stored part moves.
        let drawn = cap.consume(offered);
        prop_assert!((drawn - accepted).abs() < EPSILON);
        prop_assert!(cap.energy_stored().abs() < EPSILON);
    }
}
