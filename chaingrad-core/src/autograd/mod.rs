//! Reverse-mode automatic differentiation over linear chains.
//!
//! Applying an [`Operation`] to a [`Value`] records the link between them; calling
//! [`Value::backward`] on the last value of a chain walks those links back to the leaf,
//! assigning every value its gradient. See [`graph`] for the traversal itself.

pub mod function;
pub mod grad_check;
pub mod graph;
pub mod operation;
pub mod value;

pub use function::Function;
pub use graph::{backward, BackwardConfig, BackwardStats, TraversalStrategy};
pub use operation::Operation;
pub use value::{NodeId, Value};
