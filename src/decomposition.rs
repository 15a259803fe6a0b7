//! Data-parallel residual evaluation over row-band subdomains.
//!
//! Each subdomain owns a band of consecutive grid rows, receives its own ghosted copy of the
//! iterate and of the bed, and writes only to its own rows of the output. The result is
//! identical to a single evaluation over the whole grid.
use crate::field::GhostedField;
use crate::grid::Patch;
use crate::problem::FveModel;
use crate::Real;
use log::debug;
use nalgebra::DMatrix;
use rayon::prelude::*;

impl<T: Real> FveModel<T> {
    /// Splits the grid into at most `num_subdomains` row bands.
    pub fn subdomains(&self, num_subdomains: usize) -> Vec<Patch> {
        self.grid().whole_patch().split_rows(num_subdomains)
    }

    /// Steady residual of a global `my x mx` iterate, evaluated in parallel over row bands.
    ///
    /// A precomputed global bed array, if given, is ghost-exchanged like the iterate;
    /// otherwise the bed profile of the model is evaluated on each subdomain.
    pub fn par_residual(
        &self,
        u: &DMatrix<T>,
        bed: Option<&DMatrix<T>>,
        num_subdomains: usize,
    ) -> eyre::Result<DMatrix<T>> {
        let grid = self.grid();
        let subdomains = self.subdomains(num_subdomains);
        debug!("Evaluating residual on {} subdomains", subdomains.len());

        let local_residuals = subdomains
            .par_iter()
            .map(|patch| {
                let u_local = GhostedField::from_global(grid, *patch, u);
                let bed_local = match bed {
                    Some(bed) => GhostedField::from_global(grid, *patch, bed),
                    None => self.bed_field(*patch),
                };
                let mut output = DMatrix::zeros(patch.ym, patch.xm);
                self.residual_with_bed_into(&u_local, &bed_local, &mut output)?;
                Ok((*patch, output))
            })
            .collect::<eyre::Result<Vec<_>>>()?;

        let mut residual = DMatrix::zeros(grid.my(), grid.mx());
        for (patch, local) in local_residuals {
            residual
                .view_mut((patch.ys, patch.xs), (patch.ym, patch.xm))
                .copy_from(&local);
        }
        Ok(residual)
    }
}
