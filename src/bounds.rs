//! Box constraints `psi <= u < +inf` for the constrained solve.
use crate::grid::Patch;
use crate::problem::FveModel;
use crate::Real;
use nalgebra::DMatrix;

/// Lower and upper bounds on the owned nodes of a patch, each a `ym x xm` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds<T: Real> {
    pub lower: DMatrix<T>,
    pub upper: DMatrix<T>,
}

impl<T: Real> FveModel<T> {
    /// The obstacle as lower bound (zero for ice thickness) and `+inf` as upper bound.
    pub fn bounds(&self, patch: Patch) -> Bounds<T> {
        let grid = self.grid();
        let lower = DMatrix::from_fn(patch.ym, patch.xm, |r, c| {
            let (j, k) = ((patch.xs + c) as isize, (patch.ys + r) as isize);
            self.lower_bound(&grid.node_coords(j, k))
        });
        let upper = DMatrix::from_element(patch.ym, patch.xm, nalgebra::convert(f64::INFINITY));
        Bounds { lower, upper }
    }

    /// Bounds over the whole grid.
    pub fn global_bounds(&self) -> Bounds<T> {
        self.bounds(self.grid().whole_patch())
    }
}
