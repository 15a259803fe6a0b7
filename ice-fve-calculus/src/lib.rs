//! The contract between residual evaluation and an external nonlinear solver.
//!
//! Solvers (Newton, variational-inequality Newton, time integrators) only see a
//! [`VectorFunction`]: a map $F: \mathbb{R}^n \rightarrow \mathbb{R}^m$ that can be evaluated
//! into a caller-owned buffer. Jacobians are approximated by central finite differences,
//! which is what the residual routines in `ice-fve` are designed for.
pub mod calculus;

pub use calculus::*;
