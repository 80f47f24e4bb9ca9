// Builds y = square(exp(square(x))) at x = 0.5, backpropagates, and cross-checks
// the result against a central-difference estimate.
//
// Run with `RUST_LOG=debug` to see the traversal log.

use chaingrad_core::autograd::grad_check::{numerical_diff, DEFAULT_EPSILON};
use chaingrad_core::ops::math_elem::{Exp, Square};
use chaingrad_core::{
    BackwardConfig, ChainGradError, Function, Operation, Tensor, TraversalStrategy, Value,
};
use std::rc::Rc;

fn main() -> Result<(), ChainGradError> {
    env_logger::init();

    // --- Explicit operation instances ---
    let op_a: Rc<Operation<Tensor<f64>>> = Operation::new(Square);
    let op_b: Rc<Operation<Tensor<f64>>> = Operation::new(Exp);
    let op_c: Rc<Operation<Tensor<f64>>> = Operation::new(Square);

    let x = Value::new(Tensor::scalar(0.5));
    let a = op_a.apply(&x)?;
    let b = op_b.apply(&a)?;
    let y = op_c.apply(&b)?;

    y.assign_gradient(Tensor::scalar(1.0));
    let stats = y.backward()?;
    println!(
        "x.grad = {} ({} operations visited)",
        x.grad().map_or(f64::NAN, |g| g.item().unwrap_or(f64::NAN)),
        stats.operations_visited
    );

    println!("checking graph structure...");
    let linked = y.producer().is_some_and(|op| Rc::ptr_eq(&op, &op_c))
        && op_c.input().is_some_and(|v| v.ptr_eq(&b))
        && b.producer().is_some_and(|op| Rc::ptr_eq(&op, &op_b))
        && op_b.input().is_some_and(|v| v.ptr_eq(&a))
        && a.producer().is_some_and(|op| Rc::ptr_eq(&op, &op_a))
        && op_a.input().is_some_and(|v| v.ptr_eq(&x));
    println!("structure ok: {}", linked);

    // --- Same chain through the functional helpers, recursive traversal ---
    let x2 = Value::new(0.5f64);
    let y2 = x2.square()?.exp()?.square()?;
    y2.backward_with(&BackwardConfig::new().with_strategy(TraversalStrategy::Recursive))?;
    println!("x2.grad (recursive) = {:?}", x2.grad());

    // --- Numerical cross-check ---
    let numerical = numerical_diff(
        |x: &f64| {
            let a = Function::<f64>::forward(&Square, x)?;
            let b = Function::<f64>::forward(&Exp, &a)?;
            Function::<f64>::forward(&Square, &b)
        },
        &0.5,
        DEFAULT_EPSILON,
    )?;
    println!("numerical estimate  = {}", numerical);

    Ok(())
}
