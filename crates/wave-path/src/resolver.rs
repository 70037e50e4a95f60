//! Name to subfield resolution with per-compilation memoization

use std::collections::HashMap;

use tracing::trace;
use wave_ir::Subfield;

use crate::parser::{parse_subfield, PathError};

/// Turns raw field names into canonical subfields.
///
/// Successful parses are memoized for the lifetime of one compilation.
/// Failures are not cached; they are deterministic and abort compilation.
#[derive(Debug, Default)]
pub struct SubfieldParser {
    memo: HashMap<String, Subfield>,
}

impl SubfieldParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_subfield(&mut self, raw: &str) -> Result<Subfield, PathError> {
        if let Some(subfield) = self.memo.get(raw) {
            return Ok(subfield.clone());
        }

        let subfield = parse_subfield(raw)?;
        trace!(raw, subfield = %subfield, "parsed subfield");
        self.memo.insert(raw.to_string(), subfield.clone());
        Ok(subfield)
    }

    /// Number of distinct names parsed so far
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memoizes_successful_parses() {
        let mut parser = SubfieldParser::new();
        let first = parser.to_subfield("x").unwrap();
        let second = parser.to_subfield("x").unwrap();

        assert_eq!(first, second);
        assert_eq!(parser.len(), 1);
    }

    #[test]
    fn test_failures_not_memoized() {
        let mut parser = SubfieldParser::new();
        assert!(parser.to_subfield("a[").is_err());
        assert!(parser.to_subfield("a[").is_err());
        assert!(parser.is_empty());
    }
}
