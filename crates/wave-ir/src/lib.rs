//! Wave Intermediate Representation (IR)
//!
//! Logical types and subfield paths shared by the path parser and the
//! operand compiler. Type trees are immutable and shared through [`TypePtr`].

mod subfield;
mod types;

pub use subfield::*;
pub use types::*;
