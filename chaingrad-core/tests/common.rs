use chaingrad_core::ops::math_elem::{exp_op, square_op};
use chaingrad_core::{ChainGradError, Payload, Value};

/// Kernels available to the chain-building helpers.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpKind {
    Square,
    Exp,
}

// Attempt to initialize env_logger. If it fails (already initialized), that's okay.
#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Applies `kinds` in order starting from `leaf`, returning every value of the chain
/// (leaf first, terminal last).
#[allow(dead_code)]
pub fn build_chain<P: Payload>(
    leaf: &Value<P>,
    kinds: &[OpKind],
) -> Result<Vec<Value<P>>, ChainGradError> {
    let mut values = vec![leaf.clone()];
    for kind in kinds {
        let last = values[values.len() - 1].clone();
        let next = match kind {
            OpKind::Square => square_op(&last)?,
            OpKind::Exp => exp_op(&last)?,
        };
        values.push(next);
    }
    Ok(values)
}
