//! Compilation context shared by every operator of one pipeline

use serde::{Deserialize, Serialize};
use tracing::warn;
use wave_ir::{Subfield, TypePtr};
use wave_path::{PathError, SubfieldParser};

use crate::allocator::OperandAllocator;
use crate::definitions::{BindingConflict, DefinitionTable};
use crate::operand::{OperandId, OperandRef};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Fail compilation when a subfield is re-resolved with a different
    /// type or label. When false the conflict is only recorded and logged.
    #[serde(default = "default_strict_bindings")]
    pub strict_bindings: bool,
}

fn default_strict_bindings() -> bool {
    true
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            strict_bindings: default_strict_bindings(),
        }
    }
}

/// Owns operand identity for one pipeline compilation.
///
/// Operators are built one at a time against a `&mut CompileState`; nothing
/// here is shared across threads.
#[derive(Debug, Default)]
pub struct CompileState {
    options: CompileOptions,
    allocator: OperandAllocator,
    definitions: DefinitionTable,
    parser: SubfieldParser,
    conflicts: Vec<BindingConflict>,
}

impl CompileState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CompileOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn to_subfield(&mut self, name: &str) -> Result<Subfield, PathError> {
        self.parser.to_subfield(name)
    }

    /// Allocates an operand that is not bound to any subfield
    pub fn new_operand(&mut self, ty: TypePtr, label: Option<&str>) -> OperandRef {
        self.allocator.allocate(ty, label)
    }

    /// Returns the operand bound to `subfield`, allocating and binding one if
    /// the subfield is new.
    ///
    /// A known subfield requested with a different type or label keeps its
    /// binding. The conflict is recorded, and returned as an error in strict mode.
    pub fn resolve(
        &mut self,
        subfield: Subfield,
        ty: TypePtr,
        label: Option<&str>,
    ) -> Result<OperandRef, BindingConflict> {
        if let Some(existing) = self.definitions.get(&subfield).cloned() {
            if let Some(conflict) = self.check_binding(&subfield, &ty, label) {
                self.record_conflict(&conflict);
                if self.options.strict_bindings {
                    return Err(conflict);
                }
            }
            return Ok(existing);
        }

        let operand = self.allocator.allocate(ty, label);
        Ok(self.definitions.bind(subfield, operand).clone())
    }

    pub(crate) fn record_conflict(&mut self, conflict: &BindingConflict) {
        warn!(
            subfield = %conflict.subfield,
            bound = %conflict.bound_type,
            requested = %conflict.requested_type,
            strict = self.options.strict_bindings,
            "inconsistent subfield binding"
        );
        self.conflicts.push(conflict.clone());
    }

    /// Conflict `resolve` would report for this request, without side effects
    pub fn check_binding(
        &self,
        subfield: &Subfield,
        ty: &TypePtr,
        label: Option<&str>,
    ) -> Option<BindingConflict> {
        let existing = self.definitions.get(subfield)?;
        BindingConflict::check(subfield, existing.ty(), existing.label(), ty, label)
    }

    pub fn definition(&self, subfield: &Subfield) -> Option<&OperandRef> {
        self.definitions.get(subfield)
    }

    pub fn operand(&self, id: OperandId) -> Option<&OperandRef> {
        self.allocator.get(id)
    }

    /// Every operand allocated so far, in id order
    pub fn operands(&self) -> &[OperandRef] {
        self.allocator.as_slice()
    }

    pub fn definitions(&self) -> &DefinitionTable {
        &self.definitions
    }

    pub fn conflicts(&self) -> &[BindingConflict] {
        &self.conflicts
    }
}
