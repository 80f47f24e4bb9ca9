use crate::error::ChainGradError;
use crate::ops::traits::payload::Payload;
use std::fmt::Debug;

/// Defines the numeric rules of a differentiable single-input, single-output operation.
///
/// A `Function` is stateless: it knows how to evaluate itself and how to turn the
/// gradient of its output into the gradient of its input. Everything graph-related
/// (caching the input, linking the output to its producer) is done by the
/// [`Operation`](super::Operation) node that wraps it.
///
/// Both rules have default implementations that fail with
/// `ChainGradError::NotImplemented`, so a kernel that forgets one of them surfaces
/// the defect the first time the missing rule is reached.
pub trait Function<P: Payload>: Debug {
    /// Name used in errors and log lines.
    fn name(&self) -> &str;

    /// Computes the output payload from the input payload.
    ///
    /// Must be pure: the same input always yields the same output.
    fn forward(&self, _x: &P) -> Result<P, ChainGradError> {
        Err(ChainGradError::not_implemented(self.name(), "forward"))
    }

    /// Computes \( \frac{dL}{dx} \) from the forward input `x` and \( \frac{dL}{dy} \) (`grad_output`).
    fn backward(&self, _x: &P, _grad_output: &P) -> Result<P, ChainGradError> {
        Err(ChainGradError::not_implemented(self.name(), "backward"))
    }
}
