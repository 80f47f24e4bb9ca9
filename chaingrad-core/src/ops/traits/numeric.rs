use num_traits::{Float, NumAssignOps, NumOps};
use std::fmt::Debug;

/// A trait representing the element types kernels can differentiate through.
///
/// This bounds the types (`f32`, `f64`) stored in a [`Tensor`](crate::tensor::Tensor)
/// or used directly as a scalar payload. `Float` already provides `zero()`,
/// `one()`, `exp()` and the conversions needed by the gradient checker.
pub trait GradNumeric:
    Float // Includes Num + Copy + Bounded + Signed + etc.
    + NumAssignOps
    + NumOps
    + PartialOrd
    + Debug
    + Copy
    + 'static
{
}

impl GradNumeric for f32 {}
impl GradNumeric for f64 {}
