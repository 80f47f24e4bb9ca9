// Element-wise differentiable kernels
pub mod exp;
pub mod square;

pub use exp::{exp_op, Exp};
pub use square::{square_op, Square};
