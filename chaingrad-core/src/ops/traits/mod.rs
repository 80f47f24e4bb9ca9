pub mod numeric;
pub mod payload;

pub use numeric::GradNumeric;
pub use payload::Payload;
