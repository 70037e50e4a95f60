//! Subfield to operand definition table

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use wave_ir::{Subfield, TypePtr};

use crate::operand::OperandRef;

/// Which physical slot currently materializes each logical column.
///
/// First registration wins. Iteration follows registration order.
#[derive(Debug, Default)]
pub struct DefinitionTable {
    bindings: IndexMap<Subfield, OperandRef>,
}

impl DefinitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, subfield: &Subfield) -> Option<&OperandRef> {
        self.bindings.get(subfield)
    }

    pub fn contains(&self, subfield: &Subfield) -> bool {
        self.bindings.contains_key(subfield)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Subfield, OperandRef> {
        self.bindings.iter()
    }

    /// Binds `operand` unless the subfield is already bound; returns the winner.
    pub(crate) fn bind(&mut self, subfield: Subfield, operand: OperandRef) -> &OperandRef {
        match self.bindings.entry(subfield) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(operand),
        }
    }
}

/// A subfield requested with a type or label that disagrees with its binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
pub struct BindingConflict {
    pub subfield: Subfield,
    pub bound_type: TypePtr,
    pub bound_label: Option<String>,
    pub requested_type: TypePtr,
    pub requested_label: Option<String>,
}

impl BindingConflict {
    /// Compares a request against an existing binding.
    ///
    /// A request without a label only has its type checked.
    pub fn check(
        subfield: &Subfield,
        bound_type: &TypePtr,
        bound_label: Option<&str>,
        requested_type: &TypePtr,
        requested_label: Option<&str>,
    ) -> Option<Self> {
        let type_matches = bound_type == requested_type;
        let label_matches = match requested_label {
            Some(label) => bound_label == Some(label),
            None => true,
        };

        if type_matches && label_matches {
            return None;
        }

        Some(Self {
            subfield: subfield.clone(),
            bound_type: bound_type.clone(),
            bound_label: bound_label.map(str::to_string),
            requested_type: requested_type.clone(),
            requested_label: requested_label.map(str::to_string),
        })
    }
}

impl fmt::Display for BindingConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "subfield '{}' is bound as {} ({}) but was requested as {} ({})",
            self.subfield,
            self.bound_type,
            self.bound_label.as_deref().unwrap_or("-"),
            self.requested_type,
            self.requested_label.as_deref().unwrap_or("-"),
        )
    }
}
