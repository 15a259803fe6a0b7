//! The doubly nonlinear flux
//!
//! $$ \mathbf{q} = - D \nabla u + \mathbf{W} |u|^q, $$
//!
//! with slope-dependent factor $\sigma = C (|\nabla (u + b)|^2 + \delta^2)^{(p-2)/2}$,
//! diffusivity $D = (1 - \epsilon) \sigma |u|^q + \epsilon D_0$ and
//! pseudo-velocity $\mathbf{W} = -\sigma \nabla b$.
//!
//! For the non-sliding shallow ice approximation, $u = H$ is the ice thickness,
//! $C = \Gamma$, $p = n + 1$ and $q = n + 2$.
use crate::control_volume::FluxDirection;
use crate::Real;
use nalgebra::Vector2;
use numeric_literals::replace_float_literals;

/// Immutable coefficients of the flux.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FluxParameters<T: Real> {
    /// Coefficient $C$ ($\Gamma$ for ice).
    pub coefficient: T,
    /// Power $q \geq 0$ on $|u|$.
    pub q: T,
    /// p-Laplacian power $p > 1$.
    pub p: T,
    /// Continuation parameter $\epsilon \in [0, 1]$.
    pub eps: T,
    /// Slope regularization $\delta > 0$.
    pub delta: T,
    /// Representative diffusivity $D_0$ used by the continuation.
    pub d0: T,
}

/// Result of a flux evaluation at a single point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FluxEvaluation<T> {
    pub diffusivity: T,
    pub flux: T,
}

impl<T: Real> FluxParameters<T> {
    /// The slope-dependent factor $\sigma$.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn sigma(&self, gu: &Vector2<T>, gb: &Vector2<T>) -> T {
        let slope = gu + gb;
        let slopesqr = slope.norm_squared() + self.delta * self.delta;
        self.coefficient * slopesqr.powf((self.p - 2.0) / 2.0)
    }

    pub fn pseudo_velocity(&self, sigma: T, gb: &Vector2<T>) -> Vector2<T> {
        -gb * sigma
    }

    /// The continuation diffusivity, which equals $D_0$ at $\epsilon = 1$.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn diffusivity(&self, sigma: T, u: T) -> T {
        (1.0 - self.eps) * sigma * u.abs().powf(self.q) + self.eps * self.d0
    }

    /// Flux component along `direction`, given the value `u`, the upwinded value `u_up` and
    /// the gradients of `u` and of the bed.
    ///
    /// Powers are taken of $|u|$ so that non-admissible iterates never produce NaN.
    pub fn evaluate(
        &self,
        gu: &Vector2<T>,
        gb: &Vector2<T>,
        u: T,
        u_up: T,
        direction: FluxDirection,
    ) -> FluxEvaluation<T> {
        let sigma = self.sigma(gu, gb);
        let diffusivity = self.diffusivity(sigma, u);
        let w = self.pseudo_velocity(sigma, gb);
        let flux = -diffusivity * direction.component(gu) + direction.component(&w) * u_up.abs().powf(self.q);
        FluxEvaluation { diffusivity, flux }
    }
}
