use ice_fve::profiles::{BedProfile, ObstacleProfile};
use ice_fve::PlanarFunction;
use matrixcompare::assert_scalar_eq;
use proptest::prelude::*;

fn hemisphere(x: f64, y: f64) -> f64 {
    ObstacleProfile::Hemisphere.evaluate(x, y)
}

#[test]
fn hemisphere_has_unit_height_at_origin() {
    assert_eq!(hemisphere(0.0, 0.0), 1.0);
    assert_scalar_eq!(hemisphere(0.6, 0.0), 0.8, comp = abs, tol = 1e-15);
    assert_scalar_eq!(hemisphere(0.0, -0.6), 0.8, comp = abs, tol = 1e-15);
}

#[test]
fn hemisphere_continues_linearly_beyond_cutoff() {
    let r0: f64 = 0.9;
    let psi0 = (1.0 - r0 * r0).sqrt();
    let dpsi0 = -r0 / psi0;

    // Continuous at r0
    assert_scalar_eq!(hemisphere(r0, 0.0), psi0, comp = abs, tol = 1e-15);
    assert_scalar_eq!(hemisphere(r0 + 1e-9, 0.0), psi0, comp = abs, tol = 1e-8);

    // Linear in the radius outside
    assert_scalar_eq!(hemisphere(2.0, 0.0), psi0 + dpsi0 * 1.1, comp = abs, tol = 1e-14);
    let r = 8.0f64.sqrt();
    assert_scalar_eq!(hemisphere(-2.0, 2.0), psi0 + dpsi0 * (r - r0), comp = abs, tol = 1e-14);
    assert!(hemisphere(-2.0, 2.0) < 0.0);
}

#[test]
fn zero_profiles() {
    assert_eq!(ObstacleProfile::Zero.evaluate(3.0, -1.0), 0.0);
    assert_eq!(BedProfile::Zero.evaluate(3.0, -1.0), 0.0);
}

#[test]
fn rolling_bed_vanishes_on_grid_lines() {
    let bed = BedProfile::<f64>::rolling();
    assert_eq!(bed.evaluate(0.0, 123.0e3), 0.0);
    assert_eq!(bed.evaluate(77.0e3, 0.0), 0.0);
    assert_scalar_eq!(bed.evaluate(75.0e3, 75.0e3), 500.0, comp = abs, tol = 1e-9);
    assert_scalar_eq!(bed.evaluate(75.0e3, 225.0e3), -500.0, comp = abs, tol = 1e-9);
}

#[test]
fn closures_are_planar_functions() {
    let tilted = |x: f64, y: f64| 2.0 * x - y;
    assert_eq!(tilted.evaluate(1.0, 1.0), 1.0);
}

proptest! {
    #[test]
    fn hemisphere_is_radially_symmetric(x in -2.0..2.0, y in -2.0..2.0) {
        let psi = hemisphere(x, y);
        prop_assert!(psi <= 1.0);
        assert_scalar_eq!(psi, hemisphere(-y, x), comp = abs, tol = 1e-14);
        assert_scalar_eq!(psi, hemisphere(-x, -y), comp = abs, tol = 1e-14);
    }
}
