//! Run configuration: physical, regularization and problem parameters.
//!
//! Parameter structs can be deserialized with serde, where missing fields take their default
//! values, or read from an [`Options`] database. Either way they must pass `validate` before
//! they are used to build a model.
use crate::cmb::{CmbModel, SECONDS_PER_YEAR};
use crate::error::ConfigError;
use crate::flux::FluxParameters;
use crate::grid::{refined_node_counts, BoundaryType};
use crate::options::Options;
use crate::profiles::BedProfile;
use crate::Real;
use serde::{Deserialize, Serialize};

fn check(name: &'static str, value: f64, admissible: bool, expected: &'static str) -> Result<(), ConfigError> {
    if admissible {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value, expected })
    }
}

fn check_unit_interval(name: &'static str, value: f64) -> Result<(), ConfigError> {
    check(name, value, (0.0..=1.0).contains(&value), "a value in [0, 1]")
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    check(name, value, value > 0.0, "a positive value")
}

fn check_nonnegative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    check(name, value, value >= 0.0, "a non-negative value")
}

/// Physical and regularization parameters of the shallow ice model.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IceParameters {
    /// Glen flow law exponent, `n > 1`.
    pub n: f64,
    /// Gravitational acceleration (m s^-2).
    pub g: f64,
    /// Ice density (kg m^-3).
    pub rho: f64,
    pub secpera: f64,
    /// Ice softness A (Pa^-n s^-1).
    #[serde(alias = "A")]
    pub softness: f64,
    /// Duration in years used by the chop-scale initial iterate.
    pub initmagic: f64,
    pub delta: f64,
    pub lambda: f64,
    /// Side length of the square domain (m).
    #[serde(alias = "L")]
    pub domain_length: f64,
    /// Representative diffusivity (m^2 s^-1).
    #[serde(alias = "D0")]
    pub d0: f64,
    pub eps: f64,
}

impl Default for IceParameters {
    fn default() -> Self {
        Self {
            n: 3.0,
            g: 9.81,
            rho: 910.0,
            secpera: SECONDS_PER_YEAR,
            // EISMINT I value
            softness: 1.0e-16 / SECONDS_PER_YEAR,
            initmagic: 1000.0,
            delta: 1.0e-4,
            lambda: 0.25,
            domain_length: 900.0e3,
            d0: 10.0,
            eps: 0.001,
        }
    }
}

impl IceParameters {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.n > 1.0) {
            return Err(ConfigError::InvalidGlenExponent(self.n));
        }
        check_positive("g", self.g)?;
        check_positive("rho", self.rho)?;
        check_positive("secpera", self.secpera)?;
        check_positive("A", self.softness)?;
        check_nonnegative("initmagic", self.initmagic)?;
        check_positive("delta", self.delta)?;
        check_unit_interval("lambda", self.lambda)?;
        check_positive("L", self.domain_length)?;
        check_nonnegative("D0", self.d0)?;
        check_unit_interval("eps", self.eps)?;
        Ok(())
    }

    /// Reads `-ice_*` options on top of the defaults and validates the result.
    pub fn from_options(options: &Options) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let params = Self {
            n: options.real("ice_n", defaults.n)?,
            softness: options.real("ice_A", defaults.softness)?,
            initmagic: options.real("ice_initmagic", defaults.initmagic)?,
            delta: options.real("ice_delta", defaults.delta)?,
            lambda: options.real("ice_lambda", defaults.lambda)?,
            domain_length: options.real("ice_L", defaults.domain_length)?,
            d0: options.real("ice_D0", defaults.d0)?,
            eps: options.real("ice_eps", defaults.eps)?,
            ..defaults
        };
        params.validate()?;
        Ok(params)
    }

    /// The flux coefficient $\Gamma = 2 A (\rho g)^n / (n + 2)$.
    pub fn gamma(&self) -> f64 {
        2.0 * self.softness * (self.rho * self.g).powf(self.n) / (self.n + 2.0)
    }

    /// Shallow ice flux: $C = \Gamma$, $p = n + 1$, $q = n + 2$.
    pub fn flux_parameters<T: Real>(&self) -> FluxParameters<T> {
        FluxParameters {
            coefficient: nalgebra::convert(self.gamma()),
            q: nalgebra::convert(self.n + 2.0),
            p: nalgebra::convert(self.n + 1.0),
            eps: nalgebra::convert(self.eps),
            delta: nalgebra::convert(self.delta),
            d0: nalgebra::convert(self.d0),
        }
    }
}

/// Climatic mass balance parameters, with the gradient given per year.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmbParameters {
    /// Equilibrium line altitude (m).
    pub ela: f64,
    /// Vertical gradient of the mass balance (a^-1).
    pub zgrad: f64,
}

impl Default for CmbParameters {
    fn default() -> Self {
        Self {
            ela: 2000.0,
            zgrad: 0.001,
        }
    }
}

impl CmbParameters {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("ela", self.ela, self.ela.is_finite(), "a finite value")?;
        check("zgrad", self.zgrad, self.zgrad.is_finite(), "a finite value")
    }

    /// Reads `-cmb_*` options on top of the defaults and validates the result.
    pub fn from_options(options: &Options) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let params = Self {
            ela: options.real("cmb_ela", defaults.ela)?,
            zgrad: options.real("cmb_zgrad", defaults.zgrad)?,
        };
        params.validate()?;
        Ok(params)
    }

    /// The model with the gradient converted to per-second units.
    pub fn model<T: Real>(&self, secpera: f64) -> CmbModel<T> {
        CmbModel::from_annual(
            nalgebra::convert(self.ela),
            nalgebra::convert(self.zgrad),
            nalgebra::convert(secpera),
        )
    }
}

/// Which steady problem to solve.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemKind {
    /// Classical obstacle problem above a hemisphere on $(-2, 2)^2$.
    Obstacle,
    /// Steady ice sheet on $[0, 1800\text{ km}]^2$.
    Ice,
}

impl ProblemKind {
    pub const CHOICES: [(&'static str, ProblemKind); 2] = [("obstacle", ProblemKind::Obstacle), ("ice", ProblemKind::Ice)];
}

/// Bed elevation map used by the ice problem.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BedKind {
    Zero,
    Rolling,
}

impl BedKind {
    pub const CHOICES: [(&'static str, BedKind); 2] = [("zero", BedKind::Zero), ("rolling", BedKind::Rolling)];

    pub fn profile<T: Real>(&self) -> BedProfile<T> {
        match self {
            BedKind::Zero => BedProfile::Zero,
            BedKind::Rolling => BedProfile::rolling(),
        }
    }
}

/// Parameters of the steady doubly nonlinear obstacle problem.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnlParameters {
    #[serde(alias = "C")]
    pub c: f64,
    pub q: f64,
    pub p: f64,
    #[serde(alias = "D0")]
    pub d0: f64,
    pub eps: f64,
    pub delta: f64,
    pub lambda: f64,
    /// Check admissibility of the iterate at the start of every residual evaluation.
    pub check_admissible: bool,
    pub problem: ProblemKind,
    pub ice_bed: BedKind,
    /// Save the final state `(u, b)` after the solve.
    pub dump: bool,
}

impl Default for DnlParameters {
    fn default() -> Self {
        Self {
            c: 1.0,
            q: 0.0,
            p: 2.0,
            d0: 1.0,
            eps: 0.001,
            delta: 1.0e-4,
            lambda: 0.25,
            check_admissible: false,
            problem: ProblemKind::Obstacle,
            ice_bed: BedKind::Zero,
            dump: false,
        }
    }
}

impl DnlParameters {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("C", self.c)?;
        if !(self.q >= 0.0) {
            return Err(ConfigError::InvalidPorousExponent(self.q));
        }
        if !(self.p > 1.0) {
            return Err(ConfigError::InvalidLaplacianExponent(self.p));
        }
        check_nonnegative("D0", self.d0)?;
        check_unit_interval("eps", self.eps)?;
        check_positive("delta", self.delta)?;
        check_unit_interval("lambda", self.lambda)?;
        Ok(())
    }

    /// Reads `-dnl_*` options on top of the defaults and validates the result.
    pub fn from_options(options: &Options) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let params = Self {
            c: options.real("dnl_C", defaults.c)?,
            q: options.real("dnl_q", defaults.q)?,
            p: options.real("dnl_p", defaults.p)?,
            d0: options.real("dnl_D0", defaults.d0)?,
            eps: options.real("dnl_eps", defaults.eps)?,
            delta: options.real("dnl_delta", defaults.delta)?,
            lambda: options.real("dnl_lambda", defaults.lambda)?,
            check_admissible: options.boolean("dnl_check_admissible", defaults.check_admissible)?,
            problem: options.choice("dnl_problem", &ProblemKind::CHOICES, defaults.problem)?,
            ice_bed: options.choice("dnl_ice_bed", &BedKind::CHOICES, defaults.ice_bed)?,
            dump: options.boolean("dnl_dump", defaults.dump)?,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn flux_parameters<T: Real>(&self) -> FluxParameters<T> {
        FluxParameters {
            coefficient: nalgebra::convert(self.c),
            q: nalgebra::convert(self.q),
            p: nalgebra::convert(self.p),
            eps: nalgebra::convert(self.eps),
            delta: nalgebra::convert(self.delta),
            d0: nalgebra::convert(self.d0),
        }
    }
}

/// Grid size, with optional uniform refinement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridParameters {
    pub mx: usize,
    pub my: usize,
    #[serde(default)]
    pub refine: usize,
}

impl GridParameters {
    pub fn new(mx: usize, my: usize) -> Self {
        Self { mx, my, refine: 0 }
    }

    /// Reads `-da_grid_x`, `-da_grid_y` and `-da_refine` on top of `defaults`.
    pub fn from_options(options: &Options, defaults: GridParameters) -> Result<Self, ConfigError> {
        let params = Self {
            mx: options.integer("da_grid_x", defaults.mx)?,
            my: options.integer("da_grid_y", defaults.my)?,
            refine: options.integer("da_refine", defaults.refine)?,
        };
        params.validate()?;
        Ok(params)
    }

    /// Requires at least two nodes per direction and a refinement whose node count fits in `usize`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mx < 2 || self.my < 2 {
            return Err(ConfigError::TooFewNodes { mx: self.mx, my: self.my });
        }
        // Periodic refinement yields the larger node count
        refined_node_counts(self.mx, self.my, self.refine, BoundaryType::Periodic)?;
        Ok(())
    }
}
