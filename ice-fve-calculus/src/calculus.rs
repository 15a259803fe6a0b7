use ice_fve_traits::Real;
use log::debug;
use nalgebra::{DMatrix, DVector, DVectorView, DVectorViewMut, Scalar};
use numeric_literals::replace_float_literals;
use std::error::Error;

pub type EvaluationError = Box<dyn Error + Send + Sync>;

/// A vector-valued function that may fail to evaluate.
///
/// Evaluation can fail, for example when an admissibility check rejects the input.
pub trait VectorFunction<T>
where
    T: Scalar,
{
    /// The dimension of the output.
    fn dimension(&self) -> usize;

    fn eval_into(&mut self, f: &mut DVectorViewMut<T>, x: &DVectorView<T>) -> Result<(), EvaluationError>;
}

impl<T, X> VectorFunction<T> for &mut X
where
    T: Scalar,
    X: VectorFunction<T>,
{
    fn dimension(&self) -> usize {
        X::dimension(self)
    }

    fn eval_into(&mut self, f: &mut DVectorViewMut<T>, x: &DVectorView<T>) -> Result<(), EvaluationError> {
        X::eval_into(self, f, x)
    }
}

/// A [`VectorFunction`] backed by a closure.
#[derive(Debug, Clone)]
pub struct ClosureVectorFunction<F> {
    dimension: usize,
    function: F,
}

impl<F> ClosureVectorFunction<F> {
    pub fn new<T>(dimension: usize, function: F) -> Self
    where
        T: Scalar,
        F: FnMut(&mut DVectorViewMut<T>, &DVectorView<T>) -> Result<(), EvaluationError>,
    {
        Self { dimension, function }
    }
}

impl<F, T> VectorFunction<T> for ClosureVectorFunction<F>
where
    T: Scalar,
    F: FnMut(&mut DVectorViewMut<T>, &DVectorView<T>) -> Result<(), EvaluationError>,
{
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn eval_into(&mut self, f: &mut DVectorViewMut<T>, x: &DVectorView<T>) -> Result<(), EvaluationError> {
        (self.function)(f, x)
    }
}

/// Approximates the Jacobian of a vector function evaluated at `x`, using
/// central finite differences with resolution `h`.
///
/// The Jacobian is the $m \times n$ matrix with entries $J_{ij} = \partial f_i / \partial x_j$,
/// where $m$ is the dimension of `f` and $n$ the length of `x`.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn approximate_jacobian<T>(mut f: impl VectorFunction<T>, x: &DVector<T>, h: T) -> Result<DMatrix<T>, EvaluationError>
where
    T: Real,
{
    let out_dim = f.dimension();
    let in_dim = x.len();
    debug!("Approximating {}x{} Jacobian with central differences", out_dim, in_dim);

    let mut result = DMatrix::zeros(out_dim, in_dim);

    // x+ := x + h e_j and x- := x - h e_j, f+ := f(x+) and f- := f(x-)
    let mut x_perturbed = x.clone();
    let mut f_plus = DVector::zeros(out_dim);
    let mut f_minus = DVector::zeros(out_dim);

    for j in 0..in_dim {
        let x_j = x[j];
        x_perturbed[j] = x_j + h;
        f.eval_into(&mut DVectorViewMut::from(&mut f_plus), &DVectorView::from(&x_perturbed))?;
        x_perturbed[j] = x_j - h;
        f.eval_into(&mut DVectorViewMut::from(&mut f_minus), &DVectorView::from(&x_perturbed))?;
        x_perturbed[j] = x_j;

        // result[.., j] := (f+ - f-) / 2h
        let mut column_j = result.column_mut(j);
        column_j.copy_from(&f_plus);
        column_j -= &f_minus;
        column_j /= 2.0 * h;
    }

    Ok(result)
}

/// Approximates the Jacobian-vector product $J(x) v$ with a single central difference,
/// as used by matrix-free Newton-Krylov methods.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn approximate_jacobian_vector_product<T>(
    mut f: impl VectorFunction<T>,
    x: &DVector<T>,
    v: &DVector<T>,
    h: T,
) -> Result<DVector<T>, EvaluationError>
where
    T: Real,
{
    assert_eq!(x.len(), v.len(), "Direction must have the same length as x.");
    let out_dim = f.dimension();
    let mut f_plus = DVector::zeros(out_dim);
    let mut f_minus = DVector::zeros(out_dim);

    let x_plus = x + v * h;
    let x_minus = x - v * h;
    f.eval_into(&mut DVectorViewMut::from(&mut f_plus), &DVectorView::from(&x_plus))?;
    f.eval_into(&mut DVectorViewMut::from(&mut f_minus), &DVectorView::from(&x_minus))?;

    Ok((f_plus - f_minus) / (2.0 * h))
}

/// Approximates the derivative of a scalar function of one variable with a central difference.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn approximate_derivative_fd<T>(mut f: impl FnMut(T) -> T, x: T, h: T) -> T
where
    T: Real,
{
    (f(x + h) - f(x - h)) / (2.0 * h)
}
