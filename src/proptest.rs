use crate::element::Q1Cell;
use ::proptest::prelude::*;
use nalgebra::Vector4;

/// A point `(xi, eta)` in the closed reference cell $[0, 1]^2$.
pub fn unit_cell_point() -> impl Strategy<Value = (f64, f64)> {
    (0.0..=1.0, 0.0..=1.0)
}

/// A positive grid spacing spanning the scales of both the obstacle and the ice problems.
pub fn spacing() -> impl Strategy<Value = f64> {
    prop_oneof![1e-3..1.0, 1.0..1e5]
}

/// Coefficients `(a, b, c, d)` of the bilinear field `a + b x + c y + d x y`.
pub fn bilinear_coefficients() -> impl Strategy<Value = [f64; 4]> {
    // Keep magnitudes moderate so that tolerances can be absolute
    let range = -10.0..10.0;
    [range.clone(), range.clone(), range.clone(), range]
}

impl Arbitrary for Q1Cell<f64> {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        let range = -10.0..10.0;
        ([range.clone(), range.clone(), range.clone(), range], spacing(), spacing())
            .prop_map(|([a, b, c, d], dx, dy)| Q1Cell::new(Vector4::new(a, b, c, d), dx, dy))
            .boxed()
    }
}
