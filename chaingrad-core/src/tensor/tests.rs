use super::*;
use approx::assert_relative_eq;

#[test]
fn test_new_tensor_ok() -> Result<(), ChainGradError> {
    let t = Tensor::new(vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3])?;
    assert_eq!(t.shape(), &[2, 3]);
    assert_eq!(t.numel(), 6);
    assert_eq!(t.data()[5], 6.0);
    Ok(())
}

#[test]
fn test_new_tensor_length_mismatch() {
    let result = Tensor::new(vec![1.0f64, 2.0, 3.0], vec![2, 2]);
    assert_eq!(
        result,
        Err(ChainGradError::TensorCreationError {
            data_len: 3,
            shape: vec![2, 2],
        })
    );
}

#[test]
fn test_scalar_tensor() -> Result<(), ChainGradError> {
    let t = Tensor::scalar(0.5f64);
    assert!(t.shape().is_empty());
    assert_eq!(t.numel(), 1);
    assert_eq!(t.item()?, 0.5);
    assert_eq!(Tensor::from(0.5f64), t);
    Ok(())
}

#[test]
fn test_item_on_multi_element_tensor_fails() {
    let t = Tensor::from_vec(vec![1.0f64, 2.0]);
    match t.item() {
        Err(ChainGradError::ShapeMismatch { actual, .. }) => assert_eq!(actual, vec![2]),
        other => panic!("Expected ShapeMismatch, got {:?}", other),
    }
}

#[test]
fn test_full_tensor() {
    let t = Tensor::full(vec![2, 2], 3.0f32);
    assert_eq!(t.to_vec(), vec![3.0; 4]);
    assert_eq!(t.shape(), &[2, 2]);
}

#[test]
fn test_map_keeps_shape_and_leaves_source_untouched() {
    let t = Tensor::new(vec![1.0f64, -2.0, 0.5, 4.0], vec![2, 2]).unwrap();
    let doubled = t.map(|x| 2.0 * x);
    assert_eq!(doubled.shape(), &[2, 2]);
    assert_eq!(doubled.to_vec(), vec![2.0, -4.0, 1.0, 8.0]);
    assert_eq!(t.to_vec(), vec![1.0, -2.0, 0.5, 4.0]);
}

#[test]
fn test_zip_map() -> Result<(), ChainGradError> {
    let a = Tensor::from_vec(vec![1.0f64, 2.0, 3.0]);
    let b = Tensor::from_vec(vec![0.1f64, 0.2, 0.3]);
    let c = a.zip_map(&b, |x, y| x * y, "mul")?;
    let expected = [0.1, 0.4, 0.9];
    for (got, want) in c.data().iter().zip(expected.iter()) {
        assert_relative_eq!(*got, *want, epsilon = 1e-12);
    }
    Ok(())
}

#[test]
fn test_zip_map_shape_mismatch() {
    let a = Tensor::new(vec![1.0f32, 2.0], vec![1, 2]).unwrap();
    let b = Tensor::new(vec![1.0f32, 2.0], vec![2, 1]).unwrap();
    let err = a.zip_map(&b, |x, y| x + y, "add").unwrap_err();
    assert_eq!(
        err,
        ChainGradError::ShapeMismatch {
            expected: vec![1, 2],
            actual: vec![2, 1],
            operation: "add".to_string(),
        }
    );
}

#[test]
fn test_clone_shares_buffer() {
    let a = Tensor::from_vec(vec![1.0f64, 2.0]);
    let b = a.clone();
    assert!(Arc::ptr_eq(&a.buffer, &b.buffer));
}
