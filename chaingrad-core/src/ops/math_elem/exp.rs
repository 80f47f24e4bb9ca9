// chaingrad-core/src/ops/math_elem/exp.rs

use crate::autograd::{Function, Operation, Value};
use crate::error::ChainGradError;
use crate::ops::traits::payload::Payload;
use num_traits::Float;

/// Kernel for the element-wise exponential \( y = e^x \).
#[derive(Debug, Clone, Copy, Default)]
pub struct Exp;

impl<P: Payload> Function<P> for Exp {
    fn name(&self) -> &str {
        "exp"
    }

    fn forward(&self, x: &P) -> Result<P, ChainGradError> {
        Ok(x.map(|v| v.exp()))
    }

    /// \\[ \frac{dL}{dx} = e^x \cdot \frac{dL}{dy} \\]
    ///
    /// \( e^x \) is recomputed from the cached input rather than read from the output.
    fn backward(&self, x: &P, grad_output: &P) -> Result<P, ChainGradError> {
        x.zip_map(grad_output, |x, gy| x.exp() * gy, "exp_backward")
    }
}

/// Computes \( e^x \) element-wise, recording a fresh [`Exp`] operation in the graph.
pub fn exp_op<P: Payload>(x: &Value<P>) -> Result<Value<P>, ChainGradError> {
    Operation::new(Exp).apply(x)
}

#[cfg(test)]
#[path = "exp_test.rs"]
mod tests;
