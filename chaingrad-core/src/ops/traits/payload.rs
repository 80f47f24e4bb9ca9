use crate::error::ChainGradError;
use crate::ops::traits::numeric::GradNumeric;
use crate::tensor::Tensor;
use num_traits::{NumCast, One};
use std::fmt::Debug;

/// The data carried by a [`Value`](crate::autograd::Value).
///
/// The autograd engine never looks inside a payload; it only clones and moves it.
/// This trait is the arithmetic surface the elementwise kernels (and the
/// gradient checker) need: a unary map, a shape-checked binary map, and a few
/// conveniences derived from them.
pub trait Payload: Clone + Debug + 'static {
    /// Element type the kernels operate on.
    type Elem: GradNumeric;

    /// Shape of the payload. Scalars report `[]`.
    fn shape(&self) -> Vec<usize>;

    /// Applies `f` to every element.
    fn map<F>(&self, f: F) -> Self
    where
        F: Fn(Self::Elem) -> Self::Elem;

    /// Combines two payloads element by element.
    ///
    /// # Errors
    /// `ChainGradError::ShapeMismatch` when the shapes differ. No broadcasting is done.
    fn zip_map<F>(&self, other: &Self, f: F, operation: &str) -> Result<Self, ChainGradError>
    where
        F: Fn(Self::Elem, Self::Elem) -> Self::Elem;

    /// Elements widened to `f64`, in row-major order.
    fn to_f64_vec(&self) -> Vec<f64>;

    /// Number of elements.
    fn numel(&self) -> usize {
        self.shape().iter().product()
    }

    /// A payload of the same shape filled with the multiplicative identity.
    fn ones_like(&self) -> Self {
        self.map(|_| Self::Elem::one())
    }

    /// Adds `delta` to every element.
    fn add_scalar(&self, delta: f64) -> Self {
        let delta = elem_from_f64::<Self::Elem>(delta);
        self.map(|x| x + delta)
    }
}

/// Converts an `f64` constant into the element type, `NaN` if it cannot be represented.
pub(crate) fn elem_from_f64<T: GradNumeric>(value: f64) -> T {
    <T as NumCast>::from(value).unwrap_or_else(T::nan)
}

macro_rules! impl_scalar_payload {
    ($t:ty) => {
        impl Payload for $t {
            type Elem = $t;

            fn shape(&self) -> Vec<usize> {
                Vec::new()
            }

            fn map<F>(&self, f: F) -> Self
            where
                F: Fn($t) -> $t,
            {
                f(*self)
            }

            fn zip_map<F>(&self, other: &Self, f: F, _operation: &str) -> Result<Self, ChainGradError>
            where
                F: Fn($t, $t) -> $t,
            {
                Ok(f(*self, *other))
            }

            fn to_f64_vec(&self) -> Vec<f64> {
                vec![*self as f64]
            }
        }
    };
}

impl_scalar_payload!(f32);
impl_scalar_payload!(f64);

impl<T: GradNumeric> Payload for Tensor<T> {
    type Elem = T;

    fn shape(&self) -> Vec<usize> {
        Tensor::shape(self).to_vec()
    }

    fn map<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T,
    {
        Tensor::map(self, f)
    }

    fn zip_map<F>(&self, other: &Self, f: F, operation: &str) -> Result<Self, ChainGradError>
    where
        F: Fn(T, T) -> T,
    {
        Tensor::zip_map(self, other, f, operation)
    }

    fn to_f64_vec(&self) -> Vec<f64> {
        self.data()
            .iter()
            .map(|x| x.to_f64().unwrap_or(f64::NAN))
            .collect()
    }
}
