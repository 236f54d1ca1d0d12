use base::{Tensor, TensorError};

#[test]
fn test_tensor_new_valid() {
    let tensor = Tensor::new(vec![1, 3, 2, 2], vec![0.5f32; 12]).unwrap();
    assert_eq!(tensor.shape, vec![1, 3, 2, 2]);
    assert_eq!(tensor.ndim(), 4);
    assert_eq!(tensor.len(), 12);
}

#[test]
fn test_tensor_new_shape_mismatch() {
    let result = Tensor::new(vec![2, 3], vec![1.0f32, 2.0, 3.0]);
    assert_eq!(
        result.err(),
        Some(TensorError::ShapeMismatch {
            expected: 6,
            got: 3
        })
    );
}

#[test]
fn test_tensor_new_overflow() {
    let result = Tensor::<f32>::new(vec![usize::MAX, 2], vec![]);
    assert!(matches!(result, Err(TensorError::ShapeOverflow)));
}

#[test]
fn test_tensor_zeros() {
    let tensor = Tensor::<f32>::zeros(vec![2, 3]).unwrap();
    assert_eq!(tensor.data, vec![0.0; 6]);
}

#[test]
fn test_tensor_argmax() {
    let tensor = Tensor::new(vec![5], vec![0.1f32, 2.5, -1.0, 2.5, 0.0]).unwrap();
    assert_eq!(tensor.argmax(), Some(1));
}

#[test]
fn test_tensor_argmax_skips_nan() {
    let tensor = Tensor::new(vec![3], vec![f32::NAN, -3.0, -4.0]).unwrap();
    assert_eq!(tensor.argmax(), Some(1));
}

#[test]
fn test_tensor_argmax_empty() {
    let tensor = Tensor::<f32>::new(vec![0], vec![]).unwrap();
    assert_eq!(tensor.argmax(), None);
}

#[test]
fn test_tensor_error_display() {
    let err = TensorError::ShapeMismatch {
        expected: 4,
        got: 2,
    };
    assert_eq!(format!("{}", err), "shape mismatch: expected 4 elements, got 2");
}
