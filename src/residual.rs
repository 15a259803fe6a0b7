//! Assembly of the discrete finite-volume-element operator.
//!
//! For every node $(j, k)$ not on a Dirichlet boundary, the steady residual is
//!
//! $$ F_{jk} = \int_{\partial V_{jk}} \mathbf{q} \cdot \mathbf{n} \, ds - f_{jk} \Delta x \Delta y, $$
//!
//! where $V_{jk}$ is the control volume around the node. The boundary integral uses the midpoint
//! rule twice on each side of the control volume, see [`crate::control_volume`]. At Dirichlet
//! boundary nodes the residual is the difference between the iterate and the prescribed value.
//!
//! For time-dependent problems in the ODE form $F(H, \dot H) = G(H)$, the source moves to the
//! right-hand side: $F$ is the flux balance plus $\dot H \Delta x \Delta y$ and
//! $G = f \Delta x \Delta y$.
use crate::calculus::{EvaluationError, VectorFunction};
use crate::control_volume::{upwind_point, CONTROL_VOLUME_BOUNDARY, ELEMENT_QUADRATURE_POINTS};
use crate::element::Q1Cell;
use crate::error::NonAdmissibleIterate;
use crate::field::GhostedField;
use crate::grid::Patch;
use crate::problem::FveModel;
use crate::workspace::{with_thread_local_workspace, Workspace};
use crate::Real;
use log::debug;
use nalgebra::{DMatrix, DVectorView, DVectorViewMut};
use std::cell::RefCell;

thread_local! { static RESIDUAL_WORKSPACE: RefCell<Workspace> = RefCell::new(Workspace::default()); }

/// Per-evaluation scratch: the staged iterate and four flux components per element.
///
/// Contents are overwritten at the start of every evaluation.
#[derive(Debug)]
struct ResidualScratch<T: Real> {
    staged: GhostedField<T>,
    fluxes: Vec<[T; 4]>,
}

impl<T: Real> Default for ResidualScratch<T> {
    fn default() -> Self {
        Self {
            staged: GhostedField::default(),
            fluxes: Vec::new(),
        }
    }
}

/// The node balance that is assembled.
#[derive(Debug, Copy, Clone)]
enum Balance<'a, T: Real> {
    /// Flux balance minus the source.
    Steady,
    /// Flux balance plus the time derivative, without the source.
    Implicit { udot: Option<&'a GhostedField<T>> },
}

/// Index of element `(j, k)` among the `(xm + 1) x (ym + 1)` elements touching the owned nodes.
fn element_index(patch: &Patch, j: isize, k: isize) -> usize {
    let r = (k - (patch.ys as isize - 1)) as usize;
    let c = (j - (patch.xs as isize - 1)) as usize;
    r * (patch.xm + 1) + c
}

fn to_f64<T: Real>(value: T) -> f64 {
    nalgebra::try_convert(value).unwrap_or(f64::NAN)
}

impl<T: Real> FveModel<T> {
    /// Verifies that the iterate is not below its lower bound at any node in the ghosted range.
    pub fn check_admissibility(&self, u: &GhostedField<T>) -> Result<(), NonAdmissibleIterate> {
        let grid = self.grid();
        let patch = u.patch();
        for (j, k) in patch.ghosted_nodes() {
            if let Some((jw, kw)) = grid.wrap(j, k) {
                let value = u.get(j, k);
                let lower = self.lower_bound(&grid.node_coords(j, k));
                if value < lower {
                    return Err(NonAdmissibleIterate {
                        j: jw,
                        k: kw,
                        value: to_f64(value),
                        lower: to_f64(lower),
                    });
                }
            }
        }
        Ok(())
    }

    /// Steady residual on the owned nodes of `u`, written to the `ym x xm` matrix `output`.
    pub fn residual_into(&self, u: &GhostedField<T>, output: &mut DMatrix<T>) -> eyre::Result<()> {
        let bed = self.bed_field(*u.patch());
        self.residual_with_bed_into(u, &bed, output)
    }

    /// Steady residual with a precomputed, ghosted bed elevation.
    ///
    /// # Panics
    ///
    /// Panics if `bed` or `output` do not match the patch of `u`.
    pub fn residual_with_bed_into(
        &self,
        u: &GhostedField<T>,
        bed: &GhostedField<T>,
        output: &mut DMatrix<T>,
    ) -> eyre::Result<()> {
        self.assemble(u, bed, Balance::Steady, output)
    }

    /// Implicit residual $F(H, \dot H)$ on the owned nodes of `u`.
    ///
    /// A missing `udot` is treated as zero. The model is autonomous, so `t` does not enter.
    pub fn implicit_residual_into(
        &self,
        _t: T,
        u: &GhostedField<T>,
        udot: Option<&GhostedField<T>>,
        output: &mut DMatrix<T>,
    ) -> eyre::Result<()> {
        if let Some(udot) = udot {
            assert_eq!(udot.patch(), u.patch(), "Time derivative must be defined on the patch of u");
        }
        let bed = self.bed_field(*u.patch());
        self.assemble(u, &bed, Balance::Implicit { udot }, output)
    }

    /// Right-hand side $G(H) = f \Delta x \Delta y$ on the owned nodes of `u`, zero at Dirichlet nodes.
    pub fn rhs_into(&self, _t: T, u: &GhostedField<T>, output: &mut DMatrix<T>) -> eyre::Result<()> {
        let bed = self.bed_field(*u.patch());
        self.rhs_with_bed_into(u, &bed, output)
    }

    /// Right-hand side with a precomputed, ghosted bed elevation.
    pub fn rhs_with_bed_into(
        &self,
        u: &GhostedField<T>,
        bed: &GhostedField<T>,
        output: &mut DMatrix<T>,
    ) -> eyre::Result<()> {
        let patch = *u.patch();
        assert_eq!(bed.patch(), &patch, "Bed must be defined on the patch of u");
        assert_eq!(output.shape(), (patch.ym, patch.xm), "Output must have shape (ym, xm)");
        let grid = self.grid();
        let area = grid.dx() * grid.dy();
        for (j, k) in patch.nodes() {
            let value = if grid.is_boundary_node(j, k) {
                T::zero()
            } else {
                let (jj, kk) = (j as isize, k as isize);
                self.source().evaluate(bed.get(jj, kk) + u.get(jj, kk)) * area
            };
            output[(k - patch.ys, j - patch.xs)] = value;
        }
        Ok(())
    }

    /// Steady residual over the whole grid for a global `my x mx` iterate.
    pub fn residual(&self, u: &DMatrix<T>) -> eyre::Result<DMatrix<T>> {
        let patch = self.grid().whole_patch();
        let u = GhostedField::from_global(self.grid(), patch, u);
        let mut output = DMatrix::zeros(patch.ym, patch.xm);
        self.residual_into(&u, &mut output)?;
        Ok(output)
    }

    /// Implicit residual over the whole grid.
    pub fn implicit_residual(&self, t: T, u: &DMatrix<T>, udot: Option<&DMatrix<T>>) -> eyre::Result<DMatrix<T>> {
        let patch = self.grid().whole_patch();
        let u = GhostedField::from_global(self.grid(), patch, u);
        let udot = udot.map(|udot| GhostedField::from_global(self.grid(), patch, udot));
        let mut output = DMatrix::zeros(patch.ym, patch.xm);
        self.implicit_residual_into(t, &u, udot.as_ref(), &mut output)?;
        Ok(output)
    }

    /// Right-hand side over the whole grid.
    pub fn rhs(&self, t: T, u: &DMatrix<T>) -> eyre::Result<DMatrix<T>> {
        let patch = self.grid().whole_patch();
        let u = GhostedField::from_global(self.grid(), patch, u);
        let mut output = DMatrix::zeros(patch.ym, patch.xm);
        self.rhs_into(t, &u, &mut output)?;
        Ok(output)
    }

    fn assemble(
        &self,
        u: &GhostedField<T>,
        bed: &GhostedField<T>,
        balance: Balance<T>,
        output: &mut DMatrix<T>,
    ) -> eyre::Result<()> {
        let patch = *u.patch();
        assert_eq!(bed.patch(), &patch, "Bed must be defined on the patch of u");
        assert_eq!(output.shape(), (patch.ym, patch.xm), "Output must have shape (ym, xm)");

        if self.check_admissible() {
            self.check_admissibility(u)?;
        }

        with_thread_local_workspace(&RESIDUAL_WORKSPACE, |scratch: &mut ResidualScratch<T>| {
            self.stage(u, &mut scratch.staged, output);
            self.compute_element_fluxes(&scratch.staged, bed, &mut scratch.fluxes);
            self.accumulate_node_balances(&scratch.staged, bed, &scratch.fluxes, balance, output);
        });
        Ok(())
    }

    /// Copies the iterate, replacing Dirichlet boundary values by the prescribed value.
    /// The residual of owned boundary nodes is set here.
    fn stage(&self, u: &GhostedField<T>, staged: &mut GhostedField<T>, output: &mut DMatrix<T>) {
        let grid = self.grid();
        let patch = *u.patch();
        staged.copy_from(u);
        if grid.is_periodic() {
            return;
        }
        let g = self.boundary_value();
        for (j, k) in patch.ghosted_nodes() {
            match grid.wrap(j, k) {
                Some((jw, kw)) if grid.is_boundary_node(jw, kw) => {
                    if patch.contains(jw, kw) {
                        output[(kw - patch.ys, jw - patch.xs)] = u.get(j, k) - g;
                    }
                    staged.set(j, k, g);
                }
                _ => {}
            }
        }
    }

    /// Evaluates the flux at the four quadrature points of every element touching an owned node.
    fn compute_element_fluxes(&self, u: &GhostedField<T>, bed: &GhostedField<T>, fluxes: &mut Vec<[T; 4]>) {
        let grid = self.grid();
        let patch = *u.patch();
        let (dx, dy) = (grid.dx(), grid.dy());
        let lambda = self.lambda();

        fluxes.clear();
        fluxes.resize((patch.xm + 1) * (patch.ym + 1), [T::zero(); 4]);

        let mut num_elements = 0;
        for k in patch.ys as isize - 1..(patch.ys + patch.ym) as isize {
            for j in patch.xs as isize - 1..(patch.xs + patch.xm) as isize {
                if !grid.has_element(j, k) {
                    continue;
                }
                let cell_u = Q1Cell::new(u.corners(j, k), dx, dy);
                let cell_b = Q1Cell::new(bed.corners(j, k), dx, dy);
                let element_fluxes = &mut fluxes[element_index(&patch, j, k)];
                for (c, point) in ELEMENT_QUADRATURE_POINTS.iter().enumerate() {
                    let (xi, eta) = point.coords();
                    let value = cell_u.value_at(xi, eta);
                    let gu = cell_u.gradient_at(xi, eta);
                    let gb = cell_b.gradient_at(xi, eta);
                    let (xi_up, eta_up) = upwind_point(point, &gb, lambda);
                    let value_up = cell_u.value_at(xi_up, eta_up);
                    element_fluxes[c] = self
                        .flux()
                        .evaluate(&gu, &gb, value, value_up, point.direction)
                        .flux;
                }
                num_elements += 1;
            }
        }
        debug!("Evaluated fluxes on {} elements for patch {:?}", num_elements, patch);
    }

    fn accumulate_node_balances(
        &self,
        u: &GhostedField<T>,
        bed: &GhostedField<T>,
        fluxes: &[[T; 4]],
        balance: Balance<T>,
        output: &mut DMatrix<T>,
    ) {
        let grid = self.grid();
        let patch = *u.patch();
        let (dx, dy) = (grid.dx(), grid.dy());
        let area = dx * dy;

        for (j, k) in patch.nodes() {
            if grid.is_boundary_node(j, k) {
                continue;
            }
            let (jj, kk) = (j as isize, k as isize);
            let mut value = match balance {
                Balance::Steady => -self.source().evaluate(bed.get(jj, kk) + u.get(jj, kk)) * area,
                Balance::Implicit { udot } => udot.map(|udot| udot.get(jj, kk) * area).unwrap_or_else(T::zero),
            };
            for point in &CONTROL_VOLUME_BOUNDARY {
                let (je, ke) = point.element_offset;
                let element_fluxes = &fluxes[element_index(&patch, jj + je, kk + ke)];
                value += point.weight(dx, dy) * element_fluxes[point.component];
            }
            output[(k - patch.ys, j - patch.xs)] = value;
        }
    }
}

/// The steady residual over the whole grid as a [`VectorFunction`] of the flattened iterate.
///
/// Node `(j, k)` has index `k * mx + j`.
#[derive(Debug, Clone)]
pub struct SteadyResidualFunction<'a, T: Real> {
    model: &'a FveModel<T>,
}

impl<'a, T: Real> SteadyResidualFunction<'a, T> {
    pub fn new(model: &'a FveModel<T>) -> Self {
        Self { model }
    }

    pub fn to_grid_array(&self, x: &DVectorView<T>) -> DMatrix<T> {
        let (mx, my) = (self.model.grid().mx(), self.model.grid().my());
        assert_eq!(x.len(), mx * my, "Vector length must equal the number of grid nodes");
        DMatrix::from_fn(my, mx, |k, j| x[k * mx + j])
    }
}

impl<'a, T: Real> VectorFunction<T> for SteadyResidualFunction<'a, T> {
    fn dimension(&self) -> usize {
        self.model.grid().mx() * self.model.grid().my()
    }

    fn eval_into(&mut self, f: &mut DVectorViewMut<T>, x: &DVectorView<T>) -> Result<(), EvaluationError> {
        let (mx, my) = (self.model.grid().mx(), self.model.grid().my());
        let residual = self
            .model
            .residual(&self.to_grid_array(x))
            .map_err(|err| -> EvaluationError { err.into() })?;
        for k in 0..my {
            for j in 0..mx {
                f[k * mx + j] = residual[(k, j)];
            }
        }
        Ok(())
    }
}
