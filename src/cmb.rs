//! Climatic mass balance (CMB) as a linear function of surface elevation.
use crate::Real;

/// Seconds per year, used to convert annual rates.
pub const SECONDS_PER_YEAR: f64 = 31556926.0;

/// $M(s) = \partial_z M \, (s - z_{ELA})$ in m/s, where $s = b + H$ is the surface elevation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CmbModel<T: Real> {
    ela: T,
    zgrad: T,
}

impl<T: Real> CmbModel<T> {
    /// Creates a model from the equilibrium line altitude (m) and gradient (1/s).
    pub fn new(ela: T, zgrad: T) -> Self {
        Self { ela, zgrad }
    }

    /// Creates a model from a gradient given per year.
    pub fn from_annual(ela: T, zgrad_per_year: T, secpera: T) -> Self {
        Self::new(ela, zgrad_per_year / secpera)
    }

    pub fn ela(&self) -> T {
        self.ela
    }

    /// Vertical gradient in 1/s.
    pub fn zgrad(&self) -> T {
        self.zgrad
    }

    pub fn mass_balance(&self, s: T) -> T {
        self.zgrad * (s - self.ela)
    }

    /// $dM/ds$, which is constant.
    pub fn dmds(&self, _s: T) -> T {
        self.zgrad
    }

    /// The "chop-scale" initial thickness $\max(M(s), 0) \cdot t_{init}$ for a
    /// duration `initmagic` given in years.
    pub fn chop_scale_thickness(&self, s: T, initmagic: T, secpera: T) -> T {
        self.mass_balance(s).max(T::zero()) * initmagic * secpera
    }
}
