use ice_fve::cmb::{CmbModel, SECONDS_PER_YEAR};
use ice_fve::config::CmbParameters;
use ice_fve::calculus::approximate_derivative_fd;
use matrixcompare::assert_scalar_eq;

#[test]
fn mass_balance_vanishes_at_equilibrium_line() {
    let cmb: CmbModel<f64> = CmbParameters::default().model(SECONDS_PER_YEAR);
    assert_eq!(cmb.ela(), 2000.0);
    assert_eq!(cmb.mass_balance(2000.0), 0.0);
    assert!(cmb.mass_balance(2500.0) > 0.0);
    assert!(cmb.mass_balance(0.0) < 0.0);
}

#[test]
fn gradient_is_converted_to_seconds() {
    let cmb = CmbModel::from_annual(2000.0, 0.001, SECONDS_PER_YEAR);
    assert_scalar_eq!(cmb.zgrad(), 0.001 / 31556926.0, comp = float);
    // 1 m/a of ablation 1000 m below the equilibrium line
    assert_scalar_eq!(cmb.mass_balance(1000.0) * SECONDS_PER_YEAR, -1.0, comp = abs, tol = 1e-12);
}

#[test]
fn derivative_matches_finite_difference() {
    let cmb = CmbModel::new(1500.0, 3.0e-11);
    for s in [0.0, 1500.0, 4000.0] {
        let fd = approximate_derivative_fd(|s| cmb.mass_balance(s), s, 1e-2);
        assert_scalar_eq!(cmb.dmds(s), fd, comp = abs, tol = 1e-18);
        assert_eq!(cmb.dmds(s), cmb.zgrad());
    }
}

#[test]
fn chop_scale_thickness_clips_ablation() {
    let cmb = CmbModel::from_annual(2000.0, 0.001, SECONDS_PER_YEAR);
    assert_eq!(cmb.chop_scale_thickness(0.0, 1000.0, SECONDS_PER_YEAR), 0.0);
    // M = 0.5 m/a at s = 2500 m, times 1000 years
    assert_scalar_eq!(
        cmb.chop_scale_thickness(2500.0, 1000.0, SECONDS_PER_YEAR),
        500.0,
        comp = abs,
        tol = 1e-9
    );
}
