//! Operand allocation

use std::sync::Arc;

use tracing::debug;
use wave_ir::TypePtr;

use crate::operand::{Operand, OperandId, OperandRef};

/// Mints operands with strictly increasing ids and keeps every one it issued.
///
/// Ids start at 0 and are the operand's index in the arena, so they are never
/// reused for the lifetime of the allocator.
#[derive(Debug, Default)]
pub struct OperandAllocator {
    operands: Vec<OperandRef>,
}

impl OperandAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, ty: TypePtr, label: Option<&str>) -> OperandRef {
        let id = OperandId(self.operands.len());
        let operand = Arc::new(Operand::new(id, ty, label.map(str::to_string)));
        debug!(id = %id, ty = %operand.ty(), label = ?operand.label(), "allocated operand");
        self.operands.push(Arc::clone(&operand));
        operand
    }

    pub fn get(&self, id: OperandId) -> Option<&OperandRef> {
        self.operands.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.operands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OperandRef> {
        self.operands.iter()
    }

    pub fn as_slice(&self) -> &[OperandRef] {
        &self.operands
    }
}
