//! Wave path - subfield grammar and name resolution

mod parser;
mod resolver;

pub use parser::{parse_subfield, PathError};
pub use resolver::SubfieldParser;
