use crate::autograd::function::Function;
use crate::autograd::value::{Value, ValueData};
use crate::error::ChainGradError;
use crate::ops::traits::payload::Payload;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// A node of the computation graph wrapping a [`Function`] kernel.
///
/// An `Operation` is applied exactly once. Applying it evaluates the kernel, wraps
/// the result in a new [`Value`] whose producer is this operation, and caches the
/// input/output pair so [`Operation::backward`] can recover the forward input and
/// traversal can read the output's gradient.
///
/// The cached input is held strongly, the cached output weakly (the output owns
/// this operation, see [`Value`]).
pub struct Operation<P: Payload> {
    function: Box<dyn Function<P>>,
    input: RefCell<Option<Value<P>>>,
    output: RefCell<Option<Weak<RefCell<ValueData<P>>>>>,
}

impl<P: Payload> Operation<P> {
    /// Wraps `function` in a fresh, not yet applied operation.
    pub fn new<F>(function: F) -> Rc<Self>
    where
        F: Function<P> + 'static,
    {
        Rc::new(Operation {
            function: Box::new(function),
            input: RefCell::new(None),
            output: RefCell::new(None),
        })
    }

    pub fn name(&self) -> &str {
        self.function.name()
    }

    /// Applies the operation to `input` and returns the new output value.
    ///
    /// # Errors
    /// * `ChainGradError::InvalidState` if this operation has already been applied.
    /// * Whatever the kernel's `forward` reports.
    pub fn apply(self: &Rc<Self>, input: &Value<P>) -> Result<Value<P>, ChainGradError> {
        if self.is_applied() {
            return Err(ChainGradError::invalid_state(
                self.name(),
                "operation has already been applied",
            ));
        }

        let result = {
            let input_guard = input.read_data();
            self.function.forward(&input_guard.payload)?
        };

        let output = Value::new(result);
        output.set_producer(Rc::clone(self));
        *self.input.borrow_mut() = Some(input.clone());
        *self.output.borrow_mut() = Some(output.downgrade());

        log::trace!(
            "[apply] {} : {:?} -> {:?}",
            self.name(),
            input.node_id(),
            output.node_id()
        );
        Ok(output)
    }

    /// Evaluates the kernel on a raw payload, without touching the graph.
    pub fn forward(&self, x: &P) -> Result<P, ChainGradError> {
        self.function.forward(x)
    }

    /// Computes the gradient of the cached input from the gradient of the output.
    ///
    /// # Errors
    /// * `ChainGradError::InvalidState` if the operation has not been applied yet.
    /// * Whatever the kernel's `backward` reports (e.g. a shape mismatch).
    pub fn backward(&self, grad_output: &P) -> Result<P, ChainGradError> {
        let input_guard = self.input.borrow();
        let input = input_guard.as_ref().ok_or_else(|| {
            ChainGradError::invalid_state(self.name(), "backward called before apply")
        })?;
        let input_data = input.read_data();
        self.function.backward(&input_data.payload, grad_output)
    }

    /// The value this operation was applied to.
    pub fn input(&self) -> Option<Value<P>> {
        self.input.borrow().clone()
    }

    /// The value this operation produced, if it is still alive.
    pub fn output(&self) -> Option<Value<P>> {
        self.output.borrow().as_ref().and_then(Value::from_weak)
    }

    pub fn is_applied(&self) -> bool {
        self.input.borrow().is_some()
    }

    /// Cached `(input, output)` pair, as read by backward traversal.
    pub(crate) fn cached_pair(&self) -> Result<(Value<P>, Value<P>), ChainGradError> {
        let input = self.input().ok_or_else(|| {
            ChainGradError::invalid_state(self.name(), "operation was never applied")
        })?;
        let output = self.output().ok_or_else(|| {
            ChainGradError::invalid_state(self.name(), "cached output has been dropped")
        })?;
        Ok((input, output))
    }
}

impl<P: Payload> fmt::Debug for Operation<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("function", &self.function)
            .field("applied", &self.is_applied())
            .finish()
    }
}

impl<P: Payload> Drop for Operation<P> {
    // Unlinks the chain below this operation iteratively. The default drop glue
    // would recurse once per link and overflow the stack on long chains.
    fn drop(&mut self) {
        let mut next = self.input.get_mut().take();
        while let Some(value) = next {
            next = match Rc::try_unwrap(value.data) {
                Ok(cell) => cell
                    .into_inner()
                    .producer
                    .and_then(|op| Rc::try_unwrap(op).ok())
                    .and_then(|mut op| op.input.get_mut().take()),
                Err(_) => None,
            };
        }
    }
}
