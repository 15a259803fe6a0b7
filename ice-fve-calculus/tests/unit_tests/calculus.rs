use ice_fve_calculus::*;
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use nalgebra::{DMatrix, DVector, DVectorView, DVectorViewMut};

struct SimpleTwoDimensionalPolynomial;

impl VectorFunction<f64> for SimpleTwoDimensionalPolynomial {
    fn dimension(&self) -> usize {
        2
    }

    fn eval_into(&mut self, f: &mut DVectorViewMut<f64>, x: &DVectorView<f64>) -> Result<(), EvaluationError> {
        assert_eq!(x.len(), 2);
        assert_eq!(f.len(), x.len());
        let x1 = x[0];
        let x2 = x[1];
        f[0] = x1 * x2 + 3.0;
        f[1] = x1 * x1 + x2 * x2 + x1 + 5.0;
        Ok(())
    }
}

#[test]
fn approximate_jacobian_simple_function() {
    let x = DVector::from_column_slice(&[3.0, 4.0]);
    let j = approximate_jacobian(SimpleTwoDimensionalPolynomial, &x, 1e-6).unwrap();

    // J = [   x2           x1 ]
    //     [ 2*x1 + 1     2*x2 ]
    #[rustfmt::skip]
    let expected = DMatrix::from_row_slice(2, 2,
                                           &[4.0, 3.0,
                                             7.0, 8.0]);

    assert_matrix_eq!(j, expected, comp = abs, tol = 1e-6);
}

#[test]
fn approximate_jacobian_vector_product_matches_full_jacobian() {
    let x = DVector::from_column_slice(&[3.0, 4.0]);
    let v = DVector::from_column_slice(&[0.5, -2.0]);
    let jv = approximate_jacobian_vector_product(SimpleTwoDimensionalPolynomial, &x, &v, 1e-6).unwrap();
    let j = approximate_jacobian(SimpleTwoDimensionalPolynomial, &x, 1e-6).unwrap();

    assert_matrix_eq!(jv, j * v, comp = abs, tol = 1e-5);
}

#[test]
fn closure_vector_function_propagates_evaluation_errors() {
    let failing = ClosureVectorFunction::new(1, |_f: &mut DVectorViewMut<f64>, x: &DVectorView<f64>| {
        if x[0] < 0.0 {
            Err(EvaluationError::from("negative input"))
        } else {
            Ok(())
        }
    });

    // The central difference at 0 evaluates at -h, which must fail
    let x = DVector::from_column_slice(&[0.0]);
    assert!(approximate_jacobian(failing, &x, 1e-3).is_err());
}

#[test]
fn approximate_derivative_of_cubic() {
    let f = |x: f64| 2.0 * x * x * x - x;
    let df = approximate_derivative_fd(f, 1.5, 1e-5);
    assert_scalar_eq!(df, 6.0 * 1.5 * 1.5 - 1.0, comp = abs, tol = 1e-6);
}
