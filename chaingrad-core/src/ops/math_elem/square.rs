// chaingrad-core/src/ops/math_elem/square.rs

use crate::autograd::{Function, Operation, Value};
use crate::error::ChainGradError;
use crate::ops::traits::payload::{elem_from_f64, Payload};

/// Kernel for the element-wise square \( y = x^2 \).
#[derive(Debug, Clone, Copy, Default)]
pub struct Square;

impl<P: Payload> Function<P> for Square {
    fn name(&self) -> &str {
        "square"
    }

    fn forward(&self, x: &P) -> Result<P, ChainGradError> {
        Ok(x.map(|v| v * v))
    }

    /// Computes the gradient for \( y = x^2 \).
    ///
    /// Using the chain rule \( \frac{dL}{dx} = \frac{dL}{dy} \cdot \frac{dy}{dx} \),
    /// where \( \frac{dy}{dx} = 2x \):
    /// \\[ \frac{dL}{dx} = 2 \cdot x \cdot \frac{dL}{dy} \\]
    fn backward(&self, x: &P, grad_output: &P) -> Result<P, ChainGradError> {
        let two = elem_from_f64::<P::Elem>(2.0);
        x.zip_map(grad_output, |x, gy| two * x * gy, "square_backward")
    }
}

/// Squares `x` element-wise, recording a fresh [`Square`] operation in the graph.
///
/// # Errors
/// Propagates errors from [`Operation::apply`]; none are expected for a fresh operation.
pub fn square_op<P: Payload>(x: &Value<P>) -> Result<Value<P>, ChainGradError> {
    Operation::new(Square).apply(x)
}

// --- Tests ---
#[cfg(test)]
#[path = "square_test.rs"]
mod tests; // Link to the test file
