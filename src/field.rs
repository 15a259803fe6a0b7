//! Scalar node fields over a patch with one layer of ghost nodes.
use crate::grid::{Patch, StructuredGrid2d};
use crate::Real;
use nalgebra::{DMatrix, Point2, Vector4};

/// Node values on a [`Patch`] extended by one ghost layer on every side.
///
/// Values are addressed by *global* signed node indices `(j, k)` with
/// `xs - 1 <= j <= xs + xm` and `ys - 1 <= k <= ys + ym`.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostedField<T: Real> {
    patch: Patch,
    // Row index is k - (ys - 1), column index is j - (xs - 1)
    values: DMatrix<T>,
}

impl<T: Real> Default for GhostedField<T> {
    fn default() -> Self {
        Self::zeros(Patch::default())
    }
}

impl<T: Real> GhostedField<T> {
    pub fn zeros(patch: Patch) -> Self {
        Self {
            patch,
            values: DMatrix::zeros(patch.ym + 2, patch.xm + 2),
        }
    }

    /// Evaluates `f(j, k)` at every node of the ghosted range.
    pub fn from_fn(patch: Patch, mut f: impl FnMut(isize, isize) -> T) -> Self {
        let mut field = Self::zeros(patch);
        field.fill_with(&mut f);
        field
    }

    /// Gathers the ghosted range of `patch` from a global `my x mx` array indexed `[(k, j)]`.
    ///
    /// Periodic grids wrap around. On Dirichlet grids, ghosts outside the domain are zero.
    ///
    /// # Panics
    ///
    /// Panics if the global array does not match the grid dimensions.
    pub fn from_global(grid: &StructuredGrid2d<T>, patch: Patch, global: &DMatrix<T>) -> Self {
        let mut field = Self::zeros(patch);
        field.gather_from_global(grid, global);
        field
    }

    /// Ghost exchange into an existing field, see [`GhostedField::from_global`].
    pub fn gather_from_global(&mut self, grid: &StructuredGrid2d<T>, global: &DMatrix<T>) {
        assert_eq!(
            global.shape(),
            (grid.my(), grid.mx()),
            "Global array must have shape (my, mx)"
        );
        self.fill_with(|j, k| {
            grid.wrap(j, k)
                .map(|(j, k)| global[(k, j)])
                .unwrap_or_else(T::zero)
        });
    }

    /// Evaluates a function of position at every ghosted node.
    pub fn from_coordinates(
        grid: &StructuredGrid2d<T>,
        patch: Patch,
        mut f: impl FnMut(&Point2<T>) -> T,
    ) -> Self {
        Self::from_fn(patch, |j, k| f(&grid.node_coords(j, k)))
    }

    pub fn fill_with(&mut self, mut f: impl FnMut(isize, isize) -> T) {
        let (j0, k0) = self.ghost_origin();
        for r in 0..self.values.nrows() {
            for c in 0..self.values.ncols() {
                self.values[(r, c)] = f(j0 + c as isize, k0 + r as isize);
            }
        }
    }

    /// Makes `self` a copy of `other`, reusing the allocation when the patches agree.
    pub fn copy_from(&mut self, other: &GhostedField<T>) {
        if self.patch == other.patch {
            self.values.copy_from(&other.values);
        } else {
            self.clone_from(other);
        }
    }

    pub fn patch(&self) -> &Patch {
        &self.patch
    }

    fn ghost_origin(&self) -> (isize, isize) {
        (self.patch.xs as isize - 1, self.patch.ys as isize - 1)
    }

    fn local_index(&self, j: isize, k: isize) -> (usize, usize) {
        let (j0, k0) = self.ghost_origin();
        let (r, c) = (k - k0, j - j0);
        assert!(
            r >= 0 && c >= 0 && (r as usize) < self.values.nrows() && (c as usize) < self.values.ncols(),
            "Node ({}, {}) is outside the ghosted range of {:?}",
            j,
            k,
            self.patch
        );
        (r as usize, c as usize)
    }

    pub fn get(&self, j: isize, k: isize) -> T {
        self.values[self.local_index(j, k)]
    }

    pub fn set(&mut self, j: isize, k: isize, value: T) {
        let idx = self.local_index(j, k);
        self.values[idx] = value;
    }

    /// Values at the corners of element `(j, k)` in the order
    /// `(j, k), (j + 1, k), (j + 1, k + 1), (j, k + 1)`.
    pub fn corners(&self, j: isize, k: isize) -> Vector4<T> {
        Vector4::new(
            self.get(j, k),
            self.get(j + 1, k),
            self.get(j + 1, k + 1),
            self.get(j, k + 1),
        )
    }

    /// Values of the owned nodes as a `ym x xm` matrix indexed `[(k - ys, j - xs)]`.
    pub fn owned_values(&self) -> DMatrix<T> {
        self.values
            .view((1, 1), (self.patch.ym, self.patch.xm))
            .into_owned()
    }
}
