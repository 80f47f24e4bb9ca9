use crate::autograd::value::Value;
use crate::error::ChainGradError;
use crate::ops::traits::payload::{elem_from_f64, Payload};
use approx::abs_diff_eq;
use thiserror::Error;

/// Step used by the central-difference estimate when the caller has no better choice.
pub const DEFAULT_EPSILON: f64 = 1e-4;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed at element index {element_index}: Analytical grad {analytical_grad:?} != Numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },
    #[error("Forward function execution failed during gradient check: {0}")]
    ForwardPassError(ChainGradError),
    #[error("Backward pass execution failed during gradient check: {0}")]
    BackwardPassError(ChainGradError),
    #[error("Input has no gradient after the backward pass.")]
    MissingAnalyticalGrad,
    #[error("Numerical gradient is NaN or infinite at element {element_index}: {value:?}")]
    NumericalGradNaNOrInfinite { element_index: usize, value: f64 },
    #[error("Analytical gradient has {analytical} elements but numerical gradient has {numerical}")]
    ElementCountMismatch { analytical: usize, numerical: usize },
}

/// Estimates the derivative of `f` at `x` with a central difference.
///
/// Evaluates `f(x - eps)` and `f(x + eps)` and returns `(y1 - y0) / (2 * eps)`.
/// `eps` is added to every element at once, so for array payloads the estimate is the
/// elementwise derivative, which is exact only for elementwise functions.
///
/// Only forward evaluation is involved; no graph is built unless `f` builds one.
pub fn numerical_diff<P, F>(f: F, x: &P, eps: f64) -> Result<P, ChainGradError>
where
    P: Payload,
    F: Fn(&P) -> Result<P, ChainGradError>,
{
    let x0 = x.add_scalar(-eps);
    let x1 = x.add_scalar(eps);
    let y0 = f(&x0)?;
    let y1 = f(&x1)?;
    let two_eps = elem_from_f64::<P::Elem>(2.0 * eps);
    y1.zip_map(&y0, |a, b| (a - b) / two_eps, "numerical_diff")
}

/// Checks the analytical gradient of a chain against [`numerical_diff`].
///
/// `build` receives a fresh leaf holding `x` and must return the chain's terminal
/// value. The terminal is seeded with ones, the leaf gradient is read back and
/// compared element by element with the central-difference estimate.
///
/// # Errors
/// `GradCheckError::GradientMismatch` for the first element whose absolute difference
/// exceeds `tolerance`, or the variant describing why the check could not run.
pub fn check_grad<P, B>(build: B, x: &P, eps: f64, tolerance: f64) -> Result<(), GradCheckError>
where
    P: Payload,
    B: Fn(&Value<P>) -> Result<Value<P>, ChainGradError>,
{
    let leaf = Value::new(x.clone());
    let output = build(&leaf).map_err(GradCheckError::ForwardPassError)?;
    output
        .backward()
        .map_err(GradCheckError::BackwardPassError)?;
    let analytical = leaf
        .grad()
        .ok_or(GradCheckError::MissingAnalyticalGrad)?
        .to_f64_vec();

    let numerical = numerical_diff(|p: &P| Ok(build(&Value::new(p.clone()))?.payload()), x, eps)
        .map_err(GradCheckError::ForwardPassError)?
        .to_f64_vec();

    if analytical.len() != numerical.len() {
        return Err(GradCheckError::ElementCountMismatch {
            analytical: analytical.len(),
            numerical: numerical.len(),
        });
    }

    for (element_index, (&analytical_grad, &numerical_grad)) in
        analytical.iter().zip(numerical.iter()).enumerate()
    {
        if !numerical_grad.is_finite() {
            return Err(GradCheckError::NumericalGradNaNOrInfinite {
                element_index,
                value: numerical_grad,
            });
        }
        if !abs_diff_eq!(analytical_grad, numerical_grad, epsilon = tolerance) {
            return Err(GradCheckError::GradientMismatch {
                element_index,
                analytical_grad,
                numerical_grad,
                difference: (analytical_grad - numerical_grad).abs(),
            });
        }
    }

    log::debug!(
        "[check_grad] {} element(s) within tolerance {:e}",
        analytical.len(),
        tolerance
    );
    Ok(())
}
