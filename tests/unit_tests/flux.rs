use ice_fve::config::IceParameters;
use ice_fve::control_volume::FluxDirection;
use ice_fve::flux::FluxParameters;
use matrixcompare::assert_scalar_eq;
use nalgebra::Vector2;
use proptest::prelude::*;

fn ice_flux(eps: f64, delta: f64) -> FluxParameters<f64> {
    FluxParameters {
        eps,
        delta,
        ..IceParameters::default().flux_parameters()
    }
}

fn laplacian_flux() -> FluxParameters<f64> {
    FluxParameters {
        coefficient: 1.0,
        q: 0.0,
        p: 2.0,
        eps: 0.0,
        delta: 1e-4,
        d0: 1.0,
    }
}

#[test]
fn ice_flux_exponents_follow_glen_exponent() {
    let params = IceParameters { n: 3.0, ..IceParameters::default() };
    let flux: FluxParameters<f64> = params.flux_parameters();
    assert_eq!(flux.p, 4.0);
    assert_eq!(flux.q, 5.0);
    assert_scalar_eq!(flux.coefficient, params.gamma(), comp = float);
}

#[test]
fn zero_slope_diffusivity_is_regularized() {
    let zero = Vector2::zeros();
    let h = 1000.0;
    let flux = ice_flux(0.0, 1e-4);

    let eval = flux.evaluate(&zero, &zero, h, h, FluxDirection::X);
    assert!(eval.diffusivity.is_finite());
    assert!(eval.diffusivity > 0.0);
    assert!(eval.flux.is_finite());
    assert_eq!(eval.flux, 0.0);

    // D is proportional to delta^(n-1) = delta^2 when the slope vanishes
    let eval_double_delta = ice_flux(0.0, 2e-4).evaluate(&zero, &zero, h, h, FluxDirection::X);
    assert_scalar_eq!(
        eval_double_delta.diffusivity / eval.diffusivity,
        4.0,
        comp = abs,
        tol = 1e-12
    );

    let expected = flux.coefficient * 1e-8 * h.powf(5.0);
    assert_scalar_eq!(eval.diffusivity, expected, comp = abs, tol = 1e-12 * expected);
}

#[test]
fn flux_points_down_the_thickness_gradient() {
    let flux = ice_flux(0.001, 1e-4);
    let gh = Vector2::new(1e-3, 0.0);
    let gb = Vector2::zeros();
    let eval = flux.evaluate(&gh, &gb, 500.0, 500.0, FluxDirection::X);
    assert!(eval.diffusivity > 0.0);
    assert!(eval.flux < 0.0);
    assert_scalar_eq!(eval.flux, -eval.diffusivity * gh.x, comp = float);

    // No y-component for a purely x-directed gradient and flat bed
    let eval_y = flux.evaluate(&gh, &gb, 500.0, 500.0, FluxDirection::Y);
    assert_eq!(eval_y.flux, 0.0);
}

#[test]
fn full_continuation_gives_representative_diffusivity() {
    let flux = FluxParameters { eps: 1.0, ..ice_flux(0.0, 1e-4) };
    let sigma = flux.sigma(&Vector2::new(0.1, -0.3), &Vector2::new(0.02, 0.0));
    assert_eq!(flux.diffusivity(sigma, 2000.0), flux.d0);
}

#[test]
fn laplacian_flux_is_minus_gradient() {
    let flux = laplacian_flux();
    let gu = Vector2::new(3.0, -2.0);
    let gb = Vector2::zeros();
    let x = flux.evaluate(&gu, &gb, -5.0, 7.0, FluxDirection::X);
    let y = flux.evaluate(&gu, &gb, -5.0, 7.0, FluxDirection::Y);
    assert_scalar_eq!(x.diffusivity, 1.0, comp = float);
    assert_scalar_eq!(x.flux, -3.0, comp = float);
    assert_scalar_eq!(y.flux, 2.0, comp = float);
}

#[test]
fn bed_slope_drives_advective_flux_with_upwinded_thickness() {
    let flux = ice_flux(0.0, 1e-4);
    let gb = Vector2::new(-1e-2, 0.0);
    let gh = -gb;
    // Surface slope vanishes, so sigma is the regularized minimum
    let sigma = flux.sigma(&gh, &gb);
    assert_scalar_eq!(sigma, flux.coefficient * 1e-8, comp = float);

    let (h, h_up) = (1000.0, 1200.0);
    let eval = flux.evaluate(&gh, &gb, h, h_up, FluxDirection::X);
    let w = flux.pseudo_velocity(sigma, &gb);
    assert!(w.x > 0.0);
    let expected = -eval.diffusivity * gh.x + w.x * h_up.powf(5.0);
    assert_scalar_eq!(eval.flux, expected, comp = abs, tol = 1e-12 * expected.abs());
}

proptest! {
    #[test]
    fn flux_is_finite_for_non_admissible_values(
        h in -1e4..1e4,
        h_up in -1e4..1e4,
        gx in -1.0..1.0,
        gy in -1.0..1.0,
        bx in -1.0..1.0,
        by in -1.0..1.0,
    ) {
        let flux = ice_flux(0.001, 1e-4);
        let eval = flux.evaluate(&Vector2::new(gx, gy), &Vector2::new(bx, by), h, h_up, FluxDirection::Y);
        prop_assert!(eval.diffusivity.is_finite());
        prop_assert!(eval.diffusivity >= 0.0);
        prop_assert!(eval.flux.is_finite());
    }
}
