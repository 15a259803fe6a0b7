use nalgebra::RealField;

pub use nalgebra;

pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}

/// A scalar function of planar coordinates, such as a bed elevation map or an obstacle.
///
/// Implementations must be pure: the same `(x, y)` always yields the same value.
pub trait PlanarFunction<T> {
    fn evaluate(&self, x: T, y: T) -> T;
}

impl<T, F> PlanarFunction<T> for F
where
    F: Fn(T, T) -> T,
{
    fn evaluate(&self, x: T, y: T) -> T {
        self(x, y)
    }
}
