//! The bilinear (Q1) kernel on a rectangular grid cell.
//!
//! Local coordinates `(xi, eta)` live in the reference cell $[0, 1]^2$ whose corners are
//! numbered counter-clockwise starting from the lower-left node:
//! `(0, 0), (1, 0), (1, 1), (0, 1)`.
use crate::Real;
use nalgebra::{Matrix1x4, Matrix2x4, Vector2, Vector4};
use numeric_literals::replace_float_literals;

/// Q1 basis function values at `(xi, eta)`.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn q1_basis<T: Real>(xi: T, eta: T) -> Matrix1x4<T> {
    Matrix1x4::new(
        (1.0 - xi) * (1.0 - eta),
        xi * (1.0 - eta),
        xi * eta,
        (1.0 - xi) * eta,
    )
}

/// Derivatives of the Q1 basis functions with respect to the local coordinates.
///
/// Column `i` holds `(d/dxi, d/deta)` of basis function `i`.
#[rustfmt::skip]
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn q1_reference_gradients<T: Real>(xi: T, eta: T) -> Matrix2x4<T> {
    Matrix2x4::new(
        -(1.0 - eta), 1.0 - eta, eta,  -eta,
        -(1.0 - xi),  -xi,       xi,   1.0 - xi,
    )
}

/// A grid cell together with the nodal values of a field at its four corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Q1Cell<T: Real> {
    pub corners: Vector4<T>,
    pub dx: T,
    pub dy: T,
}

impl<T: Real> Q1Cell<T> {
    pub fn new(corners: Vector4<T>, dx: T, dy: T) -> Self {
        Self { corners, dx, dy }
    }

    /// Interpolated field value at local coordinates `(xi, eta)`.
    pub fn value_at(&self, xi: T, eta: T) -> T {
        (q1_basis(xi, eta) * self.corners)[0]
    }

    /// Gradient of the interpolant in physical coordinates at local coordinates `(xi, eta)`.
    pub fn gradient_at(&self, xi: T, eta: T) -> Vector2<T> {
        let g = q1_reference_gradients(xi, eta) * self.corners;
        Vector2::new(g.x / self.dx, g.y / self.dy)
    }
}
