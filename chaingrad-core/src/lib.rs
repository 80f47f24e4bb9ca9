// Déclare les modules principaux de la crate
pub mod autograd;
pub mod error;
pub mod ops;
pub mod tensor;
pub mod utils;

// Ré-exporte les types principaux pour qu'ils soient accessibles directement via `chaingrad_core::...`
pub use autograd::{BackwardConfig, BackwardStats, Function, Operation, TraversalStrategy, Value};
pub use error::ChainGradError;
pub use ops::traits::{GradNumeric, Payload};
pub use tensor::Tensor;
// Re-export traits required by public functions/structs
pub use num_traits;
