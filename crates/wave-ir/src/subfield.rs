//! Subfield paths identifying logical columns

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a [`Subfield`] path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PathElement {
    /// Named child of a row (`a`, `.b`)
    Field(String),
    /// Array element or integer map key (`[3]`)
    LongSubscript(i64),
    /// String map key (`["k"]`)
    StringSubscript(String),
    /// Every element of an array or map (`[*]`)
    AllSubscripts,
}

/// Canonical column path, used as the deduplication key of the definition table.
///
/// Two subfields are equal iff their elements are equal pairwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subfield {
    path: Vec<PathElement>,
}

impl Subfield {
    pub fn new(path: Vec<PathElement>) -> Self {
        Self { path }
    }

    /// Single-segment path naming a top-level field
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            path: vec![PathElement::Field(name.into())],
        }
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// True when the path is exactly one field name
    pub fn is_flat(&self) -> bool {
        matches!(self.path.as_slice(), [PathElement::Field(_)])
    }

    pub fn root_name(&self) -> Option<&str> {
        match self.path.first() {
            Some(PathElement::Field(name)) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Subfield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.path.iter().enumerate() {
            match element {
                PathElement::Field(name) if i == 0 => f.write_str(name)?,
                PathElement::Field(name) => write!(f, ".{}", name)?,
                PathElement::LongSubscript(index) => write!(f, "[{}]", index)?,
                PathElement::StringSubscript(key) => write!(f, "[\"{}\"]", key)?,
                PathElement::AllSubscripts => f.write_str("[*]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_is_elementwise() {
        let a = Subfield::root("a");
        let b = Subfield::new(vec![PathElement::Field("a".to_string())]);
        let c = Subfield::new(vec![
            PathElement::Field("a".to_string()),
            PathElement::LongSubscript(0),
        ]);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display_canonical() {
        let subfield = Subfield::new(vec![
            PathElement::Field("a".to_string()),
            PathElement::Field("b".to_string()),
            PathElement::LongSubscript(3),
            PathElement::StringSubscript("k".to_string()),
            PathElement::AllSubscripts,
        ]);
        assert_eq!(subfield.to_string(), r#"a.b[3]["k"][*]"#);
        assert!(!subfield.is_flat());
        assert_eq!(subfield.root_name(), Some("a"));
    }

    #[test]
    fn test_flat() {
        let subfield = Subfield::root("total");
        assert!(subfield.is_flat());
        assert_eq!(subfield.len(), 1);
        assert_eq!(subfield.to_string(), "total");
    }
}
