//! Wave JSON - JSON path extraction used by scalar functions
//!
//! Supported path operators:
//! - `$`   root of the document, whatever its type
//! - `.`   child of an object
//! - `[]`  array subscript, or quoted object key
//! - `*`   every element of an array

mod extractor;
mod path;

pub use extractor::{JsonExtractor, DEFAULT_CACHE_CAPACITY};
pub use path::{JsonPath, JsonPathError};
