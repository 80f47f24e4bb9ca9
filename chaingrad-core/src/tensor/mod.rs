// src/tensor/mod.rs

use crate::error::ChainGradError;
use crate::ops::traits::numeric::GradNumeric;
use std::sync::Arc;

/// Represents an immutable multi-dimensional array payload.
///
/// `Tensor` keeps its elements in an `Arc<[T]>`, so clones share the buffer
/// instead of copying it. Values in the autograd graph clone their payloads
/// freely (cached inputs, gradients), which stays cheap this way.
///
/// Elements are stored contiguously in row-major order. A tensor with shape
/// `[]` is a scalar holding one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T: GradNumeric> {
    buffer: Arc<[T]>,
    shape: Vec<usize>,
}

impl<T: GradNumeric> Tensor<T> {
    /// Creates a new tensor from row-major data and a shape.
    ///
    /// # Errors
    /// Returns `ChainGradError::TensorCreationError` if the length of `data` does not match
    /// the number of elements implied by `shape`.
    pub fn new(data: Vec<T>, shape: Vec<usize>) -> Result<Self, ChainGradError> {
        let numel: usize = shape.iter().product();
        let data_len = data.len();
        if data_len != numel {
            return Err(ChainGradError::TensorCreationError { data_len, shape });
        }
        Ok(Tensor {
            buffer: Arc::from(data),
            shape,
        })
    }

    /// Creates a rank-0 tensor holding `value`.
    pub fn scalar(value: T) -> Self {
        Tensor {
            buffer: Arc::from(vec![value]),
            shape: Vec::new(),
        }
    }

    /// Creates a rank-1 tensor from `data`.
    pub fn from_vec(data: Vec<T>) -> Self {
        let shape = vec![data.len()];
        Tensor {
            buffer: Arc::from(data),
            shape,
        }
    }

    /// Creates a tensor of the given shape with every element set to `value`.
    pub fn full(shape: Vec<usize>, value: T) -> Self {
        let numel: usize = shape.iter().product();
        Tensor {
            buffer: Arc::from(vec![value; numel]),
            shape,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn numel(&self) -> usize {
        self.buffer.len()
    }

    pub fn data(&self) -> &[T] {
        &self.buffer
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.buffer.to_vec()
    }

    /// Returns the single element of a one-element tensor.
    ///
    /// # Errors
    /// `ChainGradError::ShapeMismatch` if the tensor holds more (or fewer) than one element.
    pub fn item(&self) -> Result<T, ChainGradError> {
        match *self.buffer {
            [value] => Ok(value),
            _ => Err(ChainGradError::ShapeMismatch {
                expected: Vec::new(),
                actual: self.shape.clone(),
                operation: "item".to_string(),
            }),
        }
    }

    /// Applies `f` to every element, keeping the shape.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T,
    {
        let data: Vec<T> = self.buffer.iter().map(|&x| f(x)).collect();
        Tensor {
            buffer: Arc::from(data),
            shape: self.shape.clone(),
        }
    }

    /// Combines two tensors of identical shape element by element.
    ///
    /// # Errors
    /// `ChainGradError::ShapeMismatch` if the shapes differ.
    pub fn zip_map<F>(&self, other: &Self, f: F, operation: &str) -> Result<Self, ChainGradError>
    where
        F: Fn(T, T) -> T,
    {
        if self.shape != other.shape {
            return Err(ChainGradError::ShapeMismatch {
                expected: self.shape.clone(),
                actual: other.shape.clone(),
                operation: operation.to_string(),
            });
        }
        let data: Vec<T> = self
            .buffer
            .iter()
            .zip(other.buffer.iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Tensor {
            buffer: Arc::from(data),
            shape: self.shape.clone(),
        })
    }
}

impl<T: GradNumeric> From<T> for Tensor<T> {
    fn from(value: T) -> Self {
        Tensor::scalar(value)
    }
}

// --- Tests ---
#[cfg(test)]
mod tests;
