use crate::autograd::graph::{self, BackwardConfig, BackwardStats};
use crate::autograd::operation::Operation;
use crate::error::ChainGradError;
use crate::ops::math_elem::{exp_op, square_op};
use crate::ops::traits::payload::Payload;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

/// Stable identity of a value node: the address of its shared cell.
pub type NodeId<P> = *const RefCell<ValueData<P>>;

/// Internal storage of a [`Value`].
///
/// Wrapped in `Rc<RefCell<ValueData>>` by `Value` so that the graph can share a node
/// between the caller and the operation that consumed it, and so that backward
/// traversal can write the gradient through a shared handle.
pub struct ValueData<P: Payload> {
    /// Forward result (or user input for leaves). Never mutated after creation.
    pub(crate) payload: P,
    /// Gradient of the terminal value with respect to this one, once assigned.
    pub(crate) grad: Option<P>,
    /// Operation that produced this value. Leaves have `producer = None`.
    pub(crate) producer: Option<Rc<Operation<P>>>,
}

/// A node in the computation graph: a payload, its gradient, and the operation
/// that produced it.
///
/// `Value` is a handle. Cloning it is cheap and the clone refers to the same node,
/// so a gradient written during backward is visible through every clone.
///
/// Ownership flows from the output towards the leaf: a value owns its producer,
/// and the producer owns its cached input. The producer only keeps a weak link to
/// its output, so no reference cycle forms and the whole chain lives exactly as
/// long as someone holds the terminal value.
pub struct Value<P: Payload> {
    pub(crate) data: Rc<RefCell<ValueData<P>>>,
}

impl<P: Payload> Value<P> {
    /// Creates a leaf value (no producer, no gradient).
    pub fn new(payload: P) -> Self {
        Value {
            data: Rc::new(RefCell::new(ValueData {
                payload,
                grad: None,
                producer: None,
            })),
        }
    }

    pub(crate) fn read_data(&self) -> Ref<'_, ValueData<P>> {
        self.data.borrow()
    }

    pub(crate) fn write_data(&self) -> RefMut<'_, ValueData<P>> {
        self.data.borrow_mut()
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<ValueData<P>>> {
        Rc::downgrade(&self.data)
    }

    pub(crate) fn from_weak(weak: &Weak<RefCell<ValueData<P>>>) -> Option<Self> {
        weak.upgrade().map(|data| Value { data })
    }

    /// Returns a clone of the payload.
    pub fn payload(&self) -> P {
        self.read_data().payload.clone()
    }

    /// Returns a clone of the gradient, if one has been assigned.
    pub fn grad(&self) -> Option<P> {
        self.read_data().grad.clone()
    }

    /// Sets the gradient, replacing any previous one.
    ///
    /// No shape check is done here; kernels report mismatches when the gradient is used.
    pub fn assign_gradient(&self, grad: P) {
        self.write_data().grad = Some(grad);
    }

    /// Resets the gradient to `None`.
    pub fn clear_grad(&self) {
        self.write_data().grad = None;
    }

    /// Returns the operation that produced this value, `None` for a leaf.
    pub fn producer(&self) -> Option<Rc<Operation<P>>> {
        self.read_data().producer.clone()
    }

    /// Records the producing operation. Called once by [`Operation::apply`].
    pub(crate) fn set_producer(&self, op: Rc<Operation<P>>) {
        self.write_data().producer = Some(op);
    }

    pub fn is_leaf(&self) -> bool {
        self.read_data().producer.is_none()
    }

    pub fn node_id(&self) -> NodeId<P> {
        Rc::as_ptr(&self.data)
    }

    /// True if both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Value<P>) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Propagates gradients from this value back to the leaf with the default configuration.
    ///
    /// If no gradient has been assigned yet, the value is seeded with `ones_like(payload)`.
    pub fn backward(&self) -> Result<BackwardStats, ChainGradError> {
        graph::backward(self, &BackwardConfig::default())
    }

    /// Same as [`Value::backward`] with an explicit traversal configuration.
    pub fn backward_with(&self, config: &BackwardConfig) -> Result<BackwardStats, ChainGradError> {
        graph::backward(self, config)
    }

    /// Applies a fresh [`Square`](crate::ops::math_elem::Square) operation to this value.
    pub fn square(&self) -> Result<Value<P>, ChainGradError> {
        square_op(self)
    }

    /// Applies a fresh [`Exp`](crate::ops::math_elem::Exp) operation to this value.
    pub fn exp(&self) -> Result<Value<P>, ChainGradError> {
        exp_op(self)
    }
}

impl<P: Payload> Clone for Value<P> {
    fn clone(&self) -> Self {
        Value {
            data: Rc::clone(&self.data),
        }
    }
}

impl<P: Payload> fmt::Debug for Value<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.read_data();
        f.debug_struct("Value")
            .field("payload", &guard.payload)
            .field("grad", &guard.grad)
            .field(
                "producer",
                &guard.producer.as_ref().map(|op| op.name().to_string()),
            )
            .finish()
    }
}
