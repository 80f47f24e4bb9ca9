// chaingrad-core/src/ops/math_elem/square_test.rs

use super::*;
use crate::autograd::grad_check::{check_grad, DEFAULT_EPSILON};
use crate::tensor::Tensor;
use crate::utils::testing::check_payload_near;
use approx::assert_relative_eq;

#[test]
fn test_square_forward_scalar() -> Result<(), ChainGradError> {
    let y = square_op(&Value::new(3.0f64))?;
    assert_eq!(y.payload(), 9.0);
    Ok(())
}

#[test]
fn test_square_forward_tensor() -> Result<(), ChainGradError> {
    let x = Value::new(Tensor::new(vec![1.0f32, -2.0, 0.5, 0.0], vec![2, 2])?);
    let y = square_op(&x)?;
    check_payload_near(&y.payload(), &[2, 2], &[1.0, 4.0, 0.25, 0.0], 1e-6);
    Ok(())
}

#[test]
fn test_square_backward() -> Result<(), ChainGradError> {
    let x = Value::new(3.0f64);
    let y = square_op(&x)?;
    y.assign_gradient(1.0);
    y.backward()?;
    assert_relative_eq!(x.grad().unwrap(), 6.0);
    Ok(())
}

#[test]
fn test_square_backward_tensor_uses_upstream_grad() -> Result<(), ChainGradError> {
    let x = Value::new(Tensor::from_vec(vec![1.0f64, 2.0, -4.0]));
    let y = square_op(&x)?;
    y.assign_gradient(Tensor::from_vec(vec![0.1, 0.2, 0.3]));
    y.backward()?;
    // grad_x = 2 * x * grad_y
    check_payload_near(&x.grad().unwrap(), &[3], &[0.2, 0.8, -2.4], 1e-12);
    Ok(())
}

#[test]
fn test_square_forward_is_pure() -> Result<(), ChainGradError> {
    let x = Tensor::from_vec(vec![0.3f64, -1.7]);
    let first = Square.forward(&x)?;
    let second = Square.forward(&x)?;
    assert_eq!(first, second);
    assert_eq!(x.to_vec(), vec![0.3, -1.7]);
    Ok(())
}

#[test]
fn test_square_grad_check() {
    let x = Tensor::from_vec(vec![-1.5f64, 0.0, 0.25, 2.0]);
    assert_eq!(
        check_grad(|v: &Value<Tensor<f64>>| square_op(v), &x, DEFAULT_EPSILON, 1e-6),
        Ok(())
    );
}
