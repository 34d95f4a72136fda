use ndarray::array;
use crate::activations::Activation;

#[test]
fn test_relu_activation() {
    let relu = Activation::Relu;
    let mut input = array![[-1.0, 0.0, 1.0, 2.0]];
    relu.apply_batch(&mut input);
    assert_eq!(input, array![[0.0f32, 0.0, 1.0, 2.0]]);
}

#[test]
fn test_linear_is_identity() {
    let mut input = array![[-3.5, 0.0, 7.25]];
    Activation::Linear.apply_batch(&mut input);
    assert_eq!(input, array![[-3.5f32, 0.0, 7.25]]);
}

#[test]
fn test_relu_derivative() {
    let deriv = Activation::Relu.derivative_batch(array![[-1.0, 0.0, 0.5]].view());
    assert_eq!(deriv, array![[0.0f32, 0.0, 1.0]]);
}

#[test]
fn test_linear_derivative() {
    let deriv = Activation::Linear.derivative_batch(array![[-1.0, 4.0], [0.0, 2.0]].view());
    assert_eq!(deriv, array![[1.0f32, 1.0], [1.0, 1.0]]);
}
