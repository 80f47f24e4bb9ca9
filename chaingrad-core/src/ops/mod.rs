//! # Operations Module (`ops`)
//!
//! Differentiable kernels and the traits describing the data they operate on.
//!
//! ## Structure:
//!
//! - **Kernels:** each operation is a stateless struct (e.g. `Square`, `Exp`) implementing
//!   [`Function`](crate::autograd::Function), which holds its forward rule and its local
//!   backward rule.
//! - **`_op` Functions:** each kernel has a companion function (`square_op`, `exp_op`) that
//!   wraps a fresh [`Operation`](crate::autograd::Operation) around the kernel and applies it,
//!   recording the link in the graph.
//! - **Traits (`ops::traits`):** `GradNumeric` for element types, `Payload` for the
//!   arithmetic surface kernels rely on.
//!
//! ## Key Submodules:
//!
//! - [`math_elem`]: Element-wise math functions (square, exp).
//! - [`traits`]: Element and payload traits.

pub mod math_elem;
pub mod traits;

pub use math_elem::{exp_op, square_op};
