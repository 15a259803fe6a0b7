//! Closed-form bed elevation and obstacle profiles.
use crate::{PlanarFunction, Real};
use numeric_literals::replace_float_literals;
use serde::{Deserialize, Serialize};

/// Bed elevation $b(x, y)$.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BedProfile<T> {
    Zero,
    /// $b = a \sin(2 \pi x / \ell) \sin(2 \pi y / \ell)$.
    Rolling { amplitude: T, wavelength: T },
}

impl<T: Real> BedProfile<T> {
    /// Rolling bed with 500 m amplitude and 300 km wavelength.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn rolling() -> Self {
        BedProfile::Rolling {
            amplitude: 500.0,
            wavelength: 300.0e3,
        }
    }
}

impl<T: Real> PlanarFunction<T> for BedProfile<T> {
    fn evaluate(&self, x: T, y: T) -> T {
        match *self {
            BedProfile::Zero => T::zero(),
            BedProfile::Rolling { amplitude, wavelength } => {
                let k = T::two_pi() / wavelength;
                amplitude * (k * x).sin() * (k * y).sin()
            }
        }
    }
}

/// Obstacle $\psi(x, y)$ bounding the unknown from below.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleProfile {
    Zero,
    /// The unit hemisphere centered at the origin, continued linearly outside radius 0.9.
    Hemisphere,
}

#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn hemisphere<T: Real>(x: T, y: T) -> T {
    let r = (x * x + y * y).sqrt();
    let r0 = 0.9;
    let psi0 = (1.0 - r0 * r0).sqrt();
    let dpsi0 = -r0 / psi0;
    if r <= r0 {
        (1.0 - r * r).sqrt()
    } else {
        psi0 + dpsi0 * (r - r0)
    }
}

impl<T: Real> PlanarFunction<T> for ObstacleProfile {
    fn evaluate(&self, x: T, y: T) -> T {
        match self {
            ObstacleProfile::Zero => T::zero(),
            ObstacleProfile::Hemisphere => hemisphere(x, y),
        }
    }
}
