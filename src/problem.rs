//! Finite-volume-element models: grid, flux, source term, bed and obstacle of one run.
use crate::cmb::CmbModel;
use crate::config::{CmbParameters, DnlParameters, GridParameters, IceParameters, ProblemKind};
use crate::error::ConfigError;
use crate::field::GhostedField;
use crate::flux::FluxParameters;
use crate::grid::{BoundaryType, Patch, StructuredGrid2d};
use crate::options::Options;
use crate::profiles::{BedProfile, ObstacleProfile};
use crate::{PlanarFunction, Real};
use nalgebra::{DMatrix, Point2};
use numeric_literals::replace_float_literals;

/// The source term $f$ of the balance $\nabla \cdot \mathbf{q} = f$.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SourceTerm<T: Real> {
    Zero,
    /// Climatic mass balance evaluated at the surface elevation $s = b + u$.
    MassBalance(CmbModel<T>),
}

impl<T: Real> SourceTerm<T> {
    pub fn evaluate(&self, surface_elevation: T) -> T {
        match self {
            SourceTerm::Zero => T::zero(),
            SourceTerm::MassBalance(cmb) => cmb.mass_balance(surface_elevation),
        }
    }
}

/// An immutable description of the discrete operator for one run.
///
/// Residual assembly lives in [`crate::residual`] and box constraints in [`crate::bounds`].
#[derive(Debug, Clone, PartialEq)]
pub struct FveModel<T: Real> {
    grid: StructuredGrid2d<T>,
    flux: FluxParameters<T>,
    lambda: T,
    source: SourceTerm<T>,
    bed: BedProfile<T>,
    obstacle: ObstacleProfile,
    boundary_value: T,
    check_admissible: bool,
}

impl<T: Real> FveModel<T> {
    /// A model without upwinding, source, bed or obstacle, and a zero Dirichlet value.
    pub fn new(grid: StructuredGrid2d<T>, flux: FluxParameters<T>) -> Self {
        Self {
            grid,
            flux,
            lambda: T::zero(),
            source: SourceTerm::Zero,
            bed: BedProfile::Zero,
            obstacle: ObstacleProfile::Zero,
            boundary_value: T::zero(),
            check_admissible: false,
        }
    }

    /// Sets the amount of upwinding; `lambda = 0` is none and `lambda = 1` is full.
    pub fn with_upwinding(self, lambda: T) -> Self {
        Self { lambda, ..self }
    }

    pub fn with_source(self, source: SourceTerm<T>) -> Self {
        Self { source, ..self }
    }

    pub fn with_bed(self, bed: BedProfile<T>) -> Self {
        Self { bed, ..self }
    }

    pub fn with_obstacle(self, obstacle: ObstacleProfile) -> Self {
        Self { obstacle, ..self }
    }

    /// Sets the value prescribed at Dirichlet boundary nodes.
    pub fn with_boundary_value(self, boundary_value: T) -> Self {
        Self { boundary_value, ..self }
    }

    pub fn with_admissibility_check(self, check_admissible: bool) -> Self {
        Self {
            check_admissible,
            ..self
        }
    }

    pub fn grid(&self) -> &StructuredGrid2d<T> {
        &self.grid
    }

    pub fn flux(&self) -> &FluxParameters<T> {
        &self.flux
    }

    pub fn lambda(&self) -> T {
        self.lambda
    }

    pub fn source(&self) -> &SourceTerm<T> {
        &self.source
    }

    pub fn bed(&self) -> &BedProfile<T> {
        &self.bed
    }

    pub fn obstacle(&self) -> &ObstacleProfile {
        &self.obstacle
    }

    pub fn boundary_value(&self) -> T {
        self.boundary_value
    }

    pub fn check_admissible(&self) -> bool {
        self.check_admissible
    }

    /// Bed elevation on the ghosted range of `patch`.
    pub fn bed_field(&self, patch: Patch) -> GhostedField<T> {
        GhostedField::from_coordinates(&self.grid, patch, |x| self.bed.evaluate(x.x, x.y))
    }

    /// Bed elevation on the whole grid as a `my x mx` array.
    pub fn bed_array(&self) -> DMatrix<T> {
        self.evaluate_on_nodes(|x| self.bed.evaluate(x.x, x.y))
    }

    /// Lower bound of the unknown at a node.
    pub fn lower_bound(&self, x: &Point2<T>) -> T {
        self.obstacle.evaluate(x.x, x.y)
    }

    pub(crate) fn evaluate_on_nodes(&self, f: impl Fn(&Point2<T>) -> T) -> DMatrix<T> {
        DMatrix::from_fn(self.grid.my(), self.grid.mx(), |k, j| {
            f(&self.grid.node_coords(j as isize, k as isize))
        })
    }

    /// Initial thickness $\max(M(b), 0) \cdot t_{init}$ with `initmagic` in years.
    ///
    /// Zero everywhere when the model has no mass balance.
    pub fn chop_scale_initial_thickness(&self, initmagic: T, secpera: T) -> DMatrix<T> {
        match &self.source {
            SourceTerm::Zero => DMatrix::zeros(self.grid.my(), self.grid.mx()),
            SourceTerm::MassBalance(cmb) => self.evaluate_on_nodes(|x| {
                let b = self.bed.evaluate(x.x, x.y);
                cmb.chop_scale_thickness(b, initmagic, secpera)
            }),
        }
    }

    /// The classical obstacle problem above a hemisphere on $(-2, 2)^2$ with zero boundary values.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn obstacle_problem(params: &DnlParameters, grid: &GridParameters) -> Result<Self, ConfigError> {
        params.validate()?;
        let grid = StructuredGrid2d::new(
            Point2::new(-2.0, -2.0),
            Point2::new(2.0, 2.0),
            grid.mx,
            grid.my,
            BoundaryType::Dirichlet,
        )?
        .refine(grid.refine)?;
        grid.log_summary();
        Ok(Self::new(grid, params.flux_parameters())
            .with_upwinding(nalgebra::convert(params.lambda))
            .with_obstacle(ObstacleProfile::Hemisphere)
            .with_admissibility_check(params.check_admissible))
    }

    /// Steady ice sheet on $[0, 1800\text{ km}]^2$ with zero thickness at the boundary.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn steady_ice_problem(
        params: &DnlParameters,
        ice: &IceParameters,
        cmb: &CmbParameters,
        grid: &GridParameters,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        ice.validate()?;
        cmb.validate()?;
        let grid = StructuredGrid2d::square(1800.0e3, grid.mx, grid.my, BoundaryType::Dirichlet)?.refine(grid.refine)?;
        grid.log_summary();
        let flux = FluxParameters {
            eps: nalgebra::convert(params.eps),
            delta: nalgebra::convert(params.delta),
            d0: nalgebra::convert(params.d0),
            ..ice.flux_parameters()
        };
        Ok(Self::new(grid, flux)
            .with_upwinding(nalgebra::convert(params.lambda))
            .with_source(SourceTerm::MassBalance(cmb.model(ice.secpera)))
            .with_bed(params.ice_bed.profile())
            .with_admissibility_check(params.check_admissible))
    }

    /// The steady problem selected by `params.problem`.
    pub fn steady_problem(
        params: &DnlParameters,
        ice: &IceParameters,
        cmb: &CmbParameters,
        grid: &GridParameters,
    ) -> Result<Self, ConfigError> {
        match params.problem {
            ProblemKind::Obstacle => Self::obstacle_problem(params, grid),
            ProblemKind::Ice => Self::steady_ice_problem(params, ice, cmb, grid),
        }
    }

    /// Time-dependent ice sheet on the periodic square $[0, L]^2$ with zero bed.
    pub fn transient_ice_problem(
        ice: &IceParameters,
        cmb: &CmbParameters,
        grid: &GridParameters,
    ) -> Result<Self, ConfigError> {
        ice.validate()?;
        cmb.validate()?;
        let side: T = nalgebra::convert(ice.domain_length);
        let grid = StructuredGrid2d::square(side, grid.mx, grid.my, BoundaryType::Periodic)?.refine(grid.refine)?;
        grid.log_summary();
        Ok(Self::new(grid, ice.flux_parameters())
            .with_upwinding(nalgebra::convert(ice.lambda))
            .with_source(SourceTerm::MassBalance(cmb.model(ice.secpera))))
    }

    /// Builds the steady problem from `-dnl_*`, `-ice_*`, `-cmb_*` and `-da_*` options
    /// on a default 5 x 5 grid.
    pub fn steady_problem_from_options(options: &Options) -> Result<(Self, DnlParameters), ConfigError> {
        let params = DnlParameters::from_options(options)?;
        let ice = IceParameters::from_options(options)?;
        let cmb = CmbParameters::from_options(options)?;
        let grid = GridParameters::from_options(options, GridParameters::new(5, 5))?;
        let model = Self::steady_problem(&params, &ice, &cmb, &grid)?;
        Ok((model, params))
    }

    /// Builds the time-dependent ice problem from `-ice_*`, `-cmb_*` and `-da_*` options
    /// on a default 18 x 18 grid.
    pub fn transient_ice_problem_from_options(options: &Options) -> Result<(Self, IceParameters), ConfigError> {
        let ice = IceParameters::from_options(options)?;
        let cmb = CmbParameters::from_options(options)?;
        let grid = GridParameters::from_options(options, GridParameters::new(18, 18))?;
        let model = Self::transient_ice_problem(&ice, &cmb, &grid)?;
        Ok((model, ice))
    }
}
