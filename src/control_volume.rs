//! Geometry of the control volume around a node.
//!
//! The control volume centered at node `(j, k)` is the rectangle
//! `[x_j - dx/2, x_j + dx/2] x [y_k - dy/2, y_k + dy/2]`. It meets the four elements sharing
//! the node, and its boundary is crossed at eight quadrature points `s = 0, ..., 7`,
//! two on each side, numbered counter-clockwise from the right side:
//!
//! ```text
//!      -------------------
//!     |         |         |
//!     |    ..2..|..1..    |
//!     |   3:    |    :0   |
//!   k |--------- ---------|
//!     |   4:    |    :7   |
//!     |    ..5..|..6..    |
//!     |         |         |
//!      -------------------
//!               j
//! ```
//!
//! Each element in turn carries four flux evaluation points `c = 0, ..., 3`, each being one
//! of the boundary points of the control volume of one of its corners. Points `*` carry an
//! x-component of the flux and points `%` a y-component:
//!
//! ```text
//!      -------------------
//!     |         :         |
//!     |         *2        |
//!     |    3    :    1    |
//!     |....%.... ....%....|
//!     |         :         |
//!     |         *0        |
//!     |         :         |
//!     @-------------------
//!   (j,k)
//! ```
use crate::Real;
use nalgebra::Vector2;
use numeric_literals::replace_float_literals;

/// The Cartesian component of the flux evaluated at a quadrature point.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FluxDirection {
    X,
    Y,
}

impl FluxDirection {
    pub fn component<T: Real>(&self, v: &Vector2<T>) -> T {
        match self {
            FluxDirection::X => v.x,
            FluxDirection::Y => v.y,
        }
    }
}

/// A flux evaluation point in local element coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ElementQuadraturePoint {
    pub xi: f64,
    pub eta: f64,
    pub direction: FluxDirection,
}

impl ElementQuadraturePoint {
    pub fn coords<T: Real>(&self) -> (T, T) {
        (nalgebra::convert(self.xi), nalgebra::convert(self.eta))
    }
}

/// The four flux evaluation points of an element, indexed by `c`.
pub const ELEMENT_QUADRATURE_POINTS: [ElementQuadraturePoint; 4] = [
    ElementQuadraturePoint { xi: 0.5, eta: 0.25, direction: FluxDirection::X },
    ElementQuadraturePoint { xi: 0.75, eta: 0.5, direction: FluxDirection::Y },
    ElementQuadraturePoint { xi: 0.5, eta: 0.75, direction: FluxDirection::X },
    ElementQuadraturePoint { xi: 0.25, eta: 0.5, direction: FluxDirection::Y },
];

/// A quadrature point on the boundary of a node's control volume.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BoundaryPoint {
    /// Offset `(je, ke)` of the element holding the point, relative to the node.
    pub element_offset: (isize, isize),
    /// Index `c` of the flux evaluation point within that element.
    pub component: usize,
    /// Sign of the outward normal along the flux direction.
    pub sign: i8,
}

impl BoundaryPoint {
    /// Quadrature weight times outward normal: the point covers half of a control volume side.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn weight<T: Real>(&self, dx: T, dy: T) -> T {
        let half_side = match ELEMENT_QUADRATURE_POINTS[self.component].direction {
            FluxDirection::X => dy / 2.0,
            FluxDirection::Y => dx / 2.0,
        };
        if self.sign < 0 {
            -half_side
        } else {
            half_side
        }
    }
}

const fn boundary_point(je: isize, ke: isize, component: usize, sign: i8) -> BoundaryPoint {
    BoundaryPoint {
        element_offset: (je, ke),
        component,
        sign,
    }
}

/// The eight boundary points of a control volume, indexed by `s`.
#[rustfmt::skip]
pub const CONTROL_VOLUME_BOUNDARY: [BoundaryPoint; 8] = [
    boundary_point( 0,  0, 0,  1),
    boundary_point( 0,  0, 3,  1),
    boundary_point(-1,  0, 1,  1),
    boundary_point(-1,  0, 0, -1),
    boundary_point(-1, -1, 2, -1),
    boundary_point(-1, -1, 1, -1),
    boundary_point( 0, -1, 3, -1),
    boundary_point( 0, -1, 2,  1),
];

/// The local coordinate, along the flux direction, at which the upwinded value is sampled.
///
/// Lies in `[(1 - lambda) / 2, (1 + lambda) / 2]`, on the upstream side with respect to the
/// bed-slope component `gb_dir`.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn upwind_coordinate<T: Real>(gb_dir: T, lambda: T) -> T {
    if gb_dir <= 0.0 {
        (1.0 - lambda) * 0.5
    } else {
        (1.0 + lambda) * 0.5
    }
}

/// The local coordinates at which the upwinded value for `point` is sampled.
///
/// With `lambda == 0` this is the quadrature point itself.
pub fn upwind_point<T: Real>(point: &ElementQuadraturePoint, gb: &Vector2<T>, lambda: T) -> (T, T) {
    let (xi, eta) = point.coords();
    if lambda <= T::zero() {
        return (xi, eta);
    }
    match point.direction {
        FluxDirection::X => (upwind_coordinate(gb.x, lambda), eta),
        FluxDirection::Y => (xi, upwind_coordinate(gb.y, lambda)),
    }
}
