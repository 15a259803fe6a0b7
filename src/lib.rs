//! Finite-volume-element (FVE) residuals for shallow ice and doubly nonlinear obstacle problems.
//!
//! The crate provides the discrete operator of a Q1 finite-volume-element discretization of
//!
//! $$ - \nabla \cdot \left( C |\nabla (u + b)|^{p-2} |u|^q \nabla (u + b) \right) = f, \qquad u \geq \psi, $$
//!
//! on a structured 2D grid, together with its box constraints, so that an external
//! (constrained) nonlinear solver or time integrator can drive it. The non-sliding shallow
//! ice approximation, with $u = H$ the ice thickness and $f$ a climatic mass balance, is the
//! special case $C = \Gamma$, $p = n + 1$, $q = n + 2$.
pub mod bounds;
pub mod cmb;
pub mod config;
pub mod control_volume;
pub mod decomposition;
pub mod element;
pub mod error;
pub mod field;
pub mod flux;
pub mod grid;
pub mod io;
pub mod options;
pub mod problem;
pub mod profiles;
pub mod residual;

pub(crate) mod workspace;

pub mod calculus {
    pub use ice_fve_calculus::*;
}

#[cfg(feature = "proptest")]
pub mod proptest;

pub extern crate nalgebra;
pub extern crate vtkio;

pub use ice_fve_traits::{PlanarFunction, Real};
