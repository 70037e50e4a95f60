//! Physical execution slots

use indexmap::IndexSet;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use wave_ir::TypePtr;

/// Identity of an operand, unique within one compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct OperandId(pub(crate) usize);

impl OperandId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for OperandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// One column's data slot. Only [`crate::OperandAllocator`] creates these.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Operand {
    id: OperandId,
    #[serde(rename = "type")]
    ty: TypePtr,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

pub type OperandRef = Arc<Operand>;

impl Operand {
    pub(crate) fn new(id: OperandId, ty: TypePtr, label: Option<String>) -> Self {
        Self { id, ty, label }
    }

    pub fn id(&self) -> OperandId {
        self.id
    }

    pub fn ty(&self) -> &TypePtr {
        &self.ty
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} {}: {}", self.id, label, self.ty),
            None => write!(f, "{}: {}", self.id, self.ty),
        }
    }
}

/// Ordered, duplicate-free set of operand ids. Iterates in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OperandSet {
    ids: IndexSet<OperandId>,
}

impl OperandSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if `id` was already present; its position is unchanged.
    pub fn add(&mut self, id: OperandId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: OperandId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = OperandId> + '_ {
        self.ids.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<OperandId> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_set_keeps_first_position() {
        let mut set = OperandSet::new();
        assert!(set.add(OperandId(4)));
        assert!(set.add(OperandId(1)));
        assert!(!set.add(OperandId(4)));
        assert!(set.add(OperandId(2)));

        assert_eq!(set.to_vec(), vec![OperandId(4), OperandId(1), OperandId(2)]);
        assert!(set.contains(OperandId(1)));
        assert!(!set.contains(OperandId(0)));
    }

    #[test]
    fn test_display() {
        let op = Operand::new(OperandId(7), wave_ir::Type::BigInt.into_ptr(), Some("b".into()));
        assert_eq!(op.to_string(), "%7 b: BIGINT");
        assert_eq!(OperandId(7).to_string(), "%7");
    }
}
