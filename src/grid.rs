//! Structured, uniformly spaced 2D node grids and the rectangular patches they are split into.
use crate::error::ConfigError;
use crate::Real;
use itertools::iproduct;
use log::{info, warn};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Boundary topology of a structured grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryType {
    /// Nodes wrap around in both directions. The last node is *not* a copy of the first,
    /// so `mx` nodes span `mx` cells.
    Periodic,
    /// The outermost ring of nodes carries a prescribed value. `mx` nodes span `mx - 1` cells.
    Dirichlet,
}

/// A rectangular range of nodes `[xs, xs + xm) x [ys, ys + ym)` owned by one evaluation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Patch {
    pub xs: usize,
    pub ys: usize,
    pub xm: usize,
    pub ym: usize,
}

impl Patch {
    pub fn new(xs: usize, ys: usize, xm: usize, ym: usize) -> Self {
        Self { xs, ys, xm, ym }
    }

    pub fn x_range(&self) -> Range<usize> {
        self.xs..self.xs + self.xm
    }

    pub fn y_range(&self) -> Range<usize> {
        self.ys..self.ys + self.ym
    }

    pub fn contains(&self, j: usize, k: usize) -> bool {
        self.x_range().contains(&j) && self.y_range().contains(&k)
    }

    /// Owned nodes `(j, k)` in row-major order (`j` fastest).
    pub fn nodes(&self) -> impl Iterator<Item = (usize, usize)> {
        iproduct!(self.y_range(), self.x_range()).map(|(k, j)| (j, k))
    }

    /// Owned and ghost nodes `(j, k)` in row-major order, as signed indices.
    pub fn ghosted_nodes(&self) -> impl Iterator<Item = (isize, isize)> {
        let (xs, ys) = (self.xs as isize, self.ys as isize);
        let (xm, ym) = (self.xm as isize, self.ym as isize);
        iproduct!(ys - 1..=ys + ym, xs - 1..=xs + xm).map(|(k, j)| (j, k))
    }

    /// Splits the patch into at most `n` bands of consecutive rows with nearly equal sizes.
    ///
    /// Empty bands are never produced.
    pub fn split_rows(&self, n: usize) -> Vec<Patch> {
        let n = n.max(1);
        if n > self.ym {
            warn!(
                "Requested {} row bands for a patch with only {} rows. Using {} bands.",
                n, self.ym, self.ym
            );
        }
        let n = n.min(self.ym).max(1);
        let base = self.ym / n;
        let remainder = self.ym % n;
        let mut ys = self.ys;
        (0..n)
            .map(|i| {
                let ym = base + if i < remainder { 1 } else { 0 };
                let band = Patch::new(self.xs, ys, self.xm, ym);
                ys += ym;
                band
            })
            .filter(|band| band.ym > 0)
            .collect()
    }
}

/// A uniformly spaced grid of `mx x my` nodes on the box `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredGrid2d<T: Real> {
    min: Point2<T>,
    max: Point2<T>,
    mx: usize,
    my: usize,
    boundary: BoundaryType,
}

impl<T: Real> StructuredGrid2d<T> {
    pub fn new(
        min: Point2<T>,
        max: Point2<T>,
        mx: usize,
        my: usize,
        boundary: BoundaryType,
    ) -> Result<Self, ConfigError> {
        if mx < 2 || my < 2 {
            return Err(ConfigError::TooFewNodes { mx, my });
        }
        if !(max.x > min.x && max.y > min.y) {
            return Err(ConfigError::EmptyDomain);
        }
        let grid = Self {
            min,
            max,
            mx,
            my,
            boundary,
        };
        if boundary == BoundaryType::Dirichlet && (mx < 3 || my < 3) {
            warn!("Grid of {} x {} nodes with Dirichlet boundary has no interior nodes.", mx, my);
        }
        Ok(grid)
    }

    /// The square `[0, side]^2`.
    pub fn square(side: T, mx: usize, my: usize, boundary: BoundaryType) -> Result<Self, ConfigError> {
        Self::new(Point2::origin(), Point2::new(side, side), mx, my, boundary)
    }

    pub fn min(&self) -> &Point2<T> {
        &self.min
    }

    pub fn max(&self) -> &Point2<T> {
        &self.max
    }

    pub fn mx(&self) -> usize {
        self.mx
    }

    pub fn my(&self) -> usize {
        self.my
    }

    pub fn boundary(&self) -> BoundaryType {
        self.boundary
    }

    pub fn is_periodic(&self) -> bool {
        self.boundary == BoundaryType::Periodic
    }

    fn num_cells(&self, m: usize) -> usize {
        match self.boundary {
            BoundaryType::Periodic => m,
            BoundaryType::Dirichlet => m - 1,
        }
    }

    pub fn dx(&self) -> T {
        (self.max.x - self.min.x) / T::from_usize(self.num_cells(self.mx)).expect("usize must fit in T")
    }

    pub fn dy(&self) -> T {
        (self.max.y - self.min.y) / T::from_usize(self.num_cells(self.my)).expect("usize must fit in T")
    }

    /// The patch covering every node of the grid.
    pub fn whole_patch(&self) -> Patch {
        Patch::new(0, 0, self.mx, self.my)
    }

    /// Coordinates of node `(j, k)`. Indices outside the grid are extrapolated linearly,
    /// or wrapped first if the grid is periodic.
    pub fn node_coords(&self, j: isize, k: isize) -> Point2<T> {
        let (j, k) = match self.wrap(j, k) {
            Some((j, k)) if self.is_periodic() => (j as isize, k as isize),
            _ => (j, k),
        };
        let j = T::from_isize(j).expect("isize must fit in T");
        let k = T::from_isize(k).expect("isize must fit in T");
        Point2::new(self.min.x + j * self.dx(), self.min.y + k * self.dy())
    }

    /// Maps a possibly out-of-range node index to a node of the grid.
    ///
    /// Periodic grids wrap around; on Dirichlet grids, out-of-range indices have no node.
    pub fn wrap(&self, j: isize, k: isize) -> Option<(usize, usize)> {
        let (mx, my) = (self.mx as isize, self.my as isize);
        match self.boundary {
            BoundaryType::Periodic => Some((j.rem_euclid(mx) as usize, k.rem_euclid(my) as usize)),
            BoundaryType::Dirichlet => {
                if (0..mx).contains(&j) && (0..my).contains(&k) {
                    Some((j as usize, k as usize))
                } else {
                    None
                }
            }
        }
    }

    /// Whether `(j, k)` lies on the Dirichlet boundary. Always false for periodic grids.
    pub fn is_boundary_node(&self, j: usize, k: usize) -> bool {
        match self.boundary {
            BoundaryType::Periodic => false,
            BoundaryType::Dirichlet => j == 0 || k == 0 || j + 1 == self.mx || k + 1 == self.my,
        }
    }

    /// Whether element `(j, k)`, with lower-left node `(j, k)`, exists in the grid.
    ///
    /// Every element index exists on a periodic grid.
    pub fn has_element(&self, j: isize, k: isize) -> bool {
        match self.boundary {
            BoundaryType::Periodic => true,
            BoundaryType::Dirichlet => {
                (0..self.mx as isize - 1).contains(&j) && (0..self.my as isize - 1).contains(&k)
            }
        }
    }

    /// The grid obtained by halving the spacing `levels` times, keeping the bounding box.
    ///
    /// Fails if the refined node count does not fit in `usize`.
    pub fn refine(&self, levels: usize) -> Result<Self, ConfigError> {
        let (mx, my) = refined_node_counts(self.mx, self.my, levels, self.boundary)?;
        Ok(Self { mx, my, ..self.clone() })
    }

    /// Reports extents and spacing at `info` level.
    pub fn log_summary(&self) {
        info!(
            "solving on [{:?},{:?}] x [{:?},{:?}] ({:?} boundary); grid is {} x {} points with spacing dx = {:?} and dy = {:?}",
            self.min.x,
            self.max.x,
            self.min.y,
            self.max.y,
            self.boundary,
            self.mx,
            self.my,
            self.dx(),
            self.dy()
        );
    }
}

/// Node count along one axis after `levels` refinements, or `None` on overflow.
pub fn refined_node_count(m: usize, levels: usize, boundary: BoundaryType) -> Option<usize> {
    let factor = u32::try_from(levels)
        .ok()
        .and_then(|levels| 1usize.checked_shl(levels))?;
    match boundary {
        BoundaryType::Periodic => m.checked_mul(factor),
        BoundaryType::Dirichlet => m.checked_sub(1)?.checked_mul(factor)?.checked_add(1),
    }
}

/// Refined node counts `(mx, my)`, rejecting refinements whose total node count overflows.
pub fn refined_node_counts(
    mx: usize,
    my: usize,
    levels: usize,
    boundary: BoundaryType,
) -> Result<(usize, usize), ConfigError> {
    let counts = refined_node_count(mx, levels, boundary)
        .zip(refined_node_count(my, levels, boundary))
        .filter(|(mx, my)| mx.checked_mul(*my).is_some());
    counts.ok_or(ConfigError::OutOfRange {
        name: "da_refine",
        value: levels as f64,
        expected: "a refinement level whose node count fits in usize",
    })
}
