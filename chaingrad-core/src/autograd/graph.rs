//! Backward traversal of a linear computation chain.
//!
//! Starting from a terminal [`Value`], gradients are pushed back through every
//! producer until a leaf is reached. Two traversal strategies are available and
//! produce bit-identical gradients: an explicit work-list (the default, bounded
//! only by memory) and plain recursion (bounded by a configurable depth limit).

use crate::autograd::operation::Operation;
use crate::autograd::value::Value;
use crate::error::ChainGradError;
use crate::ops::traits::payload::Payload;
use std::rc::Rc;

/// How [`backward`] walks the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalStrategy {
    /// Explicit last-in-first-out list of pending operations.
    #[default]
    WorkList,
    /// One call frame per operation.
    Recursive,
}

/// Configuration of a backward pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackwardConfig {
    pub strategy: TraversalStrategy,
    /// Maximum chain length accepted by [`TraversalStrategy::Recursive`].
    pub max_recursion_depth: usize,
}

impl BackwardConfig {
    pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 1024;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: TraversalStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_recursion_depth(mut self, max_recursion_depth: usize) -> Self {
        self.max_recursion_depth = max_recursion_depth;
        self
    }
}

impl Default for BackwardConfig {
    fn default() -> Self {
        BackwardConfig {
            strategy: TraversalStrategy::default(),
            max_recursion_depth: Self::DEFAULT_MAX_RECURSION_DEPTH,
        }
    }
}

/// What a completed backward pass touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackwardStats {
    /// Operations whose backward rule was invoked.
    pub operations_visited: usize,
    /// Gradients written, counting the terminal's seed.
    pub gradients_assigned: usize,
}

/// Populates the gradient of every value reachable from `terminal` through producer links.
///
/// If `terminal` has no gradient yet it is seeded with `ones_like(payload)`.
/// Each operation's backward rule runs exactly once, in reverse chain order.
///
/// # Errors
/// The first error aborts the pass. Gradients already assigned stay in place and
/// must not be relied upon.
/// * `ChainGradError::InvalidState` if an operation's cache or output gradient is missing.
/// * `ChainGradError::RecursionLimitExceeded` for a recursive pass deeper than the limit.
/// * Any error reported by a kernel's backward rule.
pub fn backward<P: Payload>(
    terminal: &Value<P>,
    config: &BackwardConfig,
) -> Result<BackwardStats, ChainGradError> {
    if terminal.grad().is_none() {
        log::debug!(
            "backward() called without a seed gradient on {:?}, seeding with ones",
            terminal.node_id()
        );
        let seed = terminal.read_data().payload.ones_like();
        terminal.assign_gradient(seed);
    }

    log::debug!(
        "[backward] start at {:?} with {:?} strategy",
        terminal.node_id(),
        config.strategy
    );

    let mut stats = BackwardStats {
        operations_visited: 0,
        gradients_assigned: 1,
    };
    match config.strategy {
        TraversalStrategy::WorkList => backward_work_list(terminal, &mut stats)?,
        TraversalStrategy::Recursive => {
            backward_recursive(terminal, 0, config.max_recursion_depth, &mut stats)?
        }
    }

    log::debug!(
        "[backward] done: {} operations visited, {} gradients assigned",
        stats.operations_visited,
        stats.gradients_assigned
    );
    Ok(stats)
}

fn backward_work_list<P: Payload>(
    terminal: &Value<P>,
    stats: &mut BackwardStats,
) -> Result<(), ChainGradError> {
    let mut pending: Vec<Rc<Operation<P>>> = terminal.producer().into_iter().collect();

    while let Some(op) = pending.pop() {
        let (input, output) = op.cached_pair()?;
        let grad_output = output.grad().ok_or_else(|| {
            ChainGradError::invalid_state(op.name(), "output has no gradient to propagate")
        })?;
        propagate(&op, &input, &grad_output, stats)?;

        if let Some(producer) = input.producer() {
            pending.push(producer);
        }
    }
    Ok(())
}

fn backward_recursive<P: Payload>(
    value: &Value<P>,
    depth: usize,
    limit: usize,
    stats: &mut BackwardStats,
) -> Result<(), ChainGradError> {
    let Some(op) = value.producer() else {
        return Ok(());
    };
    if depth >= limit {
        return Err(ChainGradError::RecursionLimitExceeded { limit });
    }

    let input = op.input().ok_or_else(|| {
        ChainGradError::invalid_state(op.name(), "operation was never applied")
    })?;
    let grad_output = value.grad().ok_or_else(|| {
        ChainGradError::invalid_state(op.name(), "output has no gradient to propagate")
    })?;
    propagate(&op, &input, &grad_output, stats)?;

    backward_recursive(&input, depth + 1, limit, stats)
}

fn propagate<P: Payload>(
    op: &Operation<P>,
    input: &Value<P>,
    grad_output: &P,
    stats: &mut BackwardStats,
) -> Result<(), ChainGradError> {
    log::trace!("[backward] visiting {} -> {:?}", op.name(), input.node_id());
    let grad_input = op.backward(grad_output)?;
    input.assign_gradient(grad_input);
    stats.operations_visited += 1;
    stats.gradients_assigned += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::math_elem::{exp_op, square_op};
    use crate::tensor::Tensor;
    use crate::utils::testing::init_test_logger;
    use approx::assert_relative_eq;

    fn chain(x: &Value<f64>, n: usize) -> Result<Value<f64>, ChainGradError> {
        let mut y = x.clone();
        for i in 0..n {
            y = if i % 2 == 0 { square_op(&y)? } else { exp_op(&y)? };
        }
        Ok(y)
    }

    #[test]
    fn test_backward_on_leaf_only_seeds() -> Result<(), ChainGradError> {
        init_test_logger();
        let x = Value::new(2.0f64);
        let stats = x.backward()?;
        assert_eq!(stats.operations_visited, 0);
        assert_eq!(stats.gradients_assigned, 1);
        assert_eq!(x.grad(), Some(1.0));
        Ok(())
    }

    #[test]
    fn test_seed_gradient_is_respected() -> Result<(), ChainGradError> {
        let x = Value::new(3.0f64);
        let y = square_op(&x)?;
        y.assign_gradient(0.5);
        y.backward()?;
        assert_eq!(y.grad(), Some(0.5));
        assert_eq!(x.grad(), Some(3.0)); // 2 * 3 * 0.5
        Ok(())
    }

    #[test]
    fn test_seed_matches_tensor_shape() -> Result<(), ChainGradError> {
        let x = Value::new(Tensor::new(vec![1.0f64, 2.0, 3.0, 4.0], vec![2, 2])?);
        let y = square_op(&x)?;
        y.backward()?;
        assert_eq!(y.grad().unwrap(), Tensor::full(vec![2, 2], 1.0));
        assert_eq!(x.grad().unwrap().to_vec(), vec![2.0, 4.0, 6.0, 8.0]);
        Ok(())
    }

    #[test]
    fn test_both_strategies_report_chain_length() -> Result<(), ChainGradError> {
        init_test_logger();
        for strategy in [TraversalStrategy::WorkList, TraversalStrategy::Recursive] {
            let x = Value::new(0.1f64);
            let y = chain(&x, 5)?;
            let stats = y.backward_with(&BackwardConfig::new().with_strategy(strategy))?;
            assert_eq!(stats.operations_visited, 5);
            assert_eq!(stats.gradients_assigned, 6);
        }
        Ok(())
    }

    #[test]
    fn test_recursive_depth_limit() -> Result<(), ChainGradError> {
        let x = Value::new(0.0f64);
        let y = chain(&x, 10)?;
        let config = BackwardConfig::new()
            .with_strategy(TraversalStrategy::Recursive)
            .with_max_recursion_depth(4);
        let err = y.backward_with(&config).unwrap_err();
        assert_eq!(err, ChainGradError::RecursionLimitExceeded { limit: 4 });
        // The pass aborted part way: the leaf never received a gradient
        assert!(x.grad().is_none());
        Ok(())
    }

    #[test]
    fn test_work_list_handles_long_chains() -> Result<(), ChainGradError> {
        let x = Value::new(0.0f64);
        let mut y = x.clone();
        for _ in 0..50_000 {
            y = square_op(&y)?;
        }
        let stats = y.backward()?;
        assert_eq!(stats.operations_visited, 50_000);
        assert_eq!(x.grad(), Some(0.0));
        Ok(())
    }

    #[test]
    fn test_shape_mismatch_in_seed_aborts() -> Result<(), ChainGradError> {
        let x = Value::new(Tensor::from_vec(vec![1.0f64, 2.0]));
        let y = exp_op(&x)?;
        y.assign_gradient(Tensor::from_vec(vec![1.0, 1.0, 1.0]));
        let err = y.backward().unwrap_err();
        assert!(matches!(err, ChainGradError::ShapeMismatch { .. }));
        assert!(x.grad().is_none());
        Ok(())
    }

    #[test]
    fn test_default_config() {
        let config = BackwardConfig::default();
        assert_eq!(config.strategy, TraversalStrategy::WorkList);
        assert_eq!(
            config.max_recursion_depth,
            BackwardConfig::DEFAULT_MAX_RECURSION_DEPTH
        );
    }

    #[test]
    fn test_square_exp_square_value() -> Result<(), ChainGradError> {
        let x = Value::new(0.5f64);
        let y = chain(&x, 3)?;
        y.backward()?;
        let expected = 4.0 * 0.5 * (2.0 * 0.5f64 * 0.5).exp();
        assert_relative_eq!(x.grad().unwrap(), expected, epsilon = 1e-12);
        Ok(())
    }
}
