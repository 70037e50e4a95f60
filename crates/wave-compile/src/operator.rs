//! Pipeline operators and their output schema walk

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;
use wave_ir::{Subfield, Type, TypePtr};

use crate::definitions::BindingConflict;
use crate::error::CompileError;
use crate::operand::{OperandRef, OperandSet};
use crate::state::CompileState;

/// Compile-time node of a pipeline.
///
/// Construction walks the declared output row and binds one operand per
/// top-level field. The operator is immutable afterwards.
#[derive(Debug)]
pub struct PipelineOperator {
    stage: String,
    output_type: TypePtr,
    subfields: Vec<Subfield>,
    types: Vec<TypePtr>,
    output_ids: OperandSet,
    defines: IndexMap<Subfield, OperandRef>,
    by_name: HashMap<String, Subfield>,
}

/// Field that passed the first phase of the walk
struct PlannedField<'a> {
    name: &'a str,
    subfield: Subfield,
    ty: &'a TypePtr,
}

impl PipelineOperator {
    /// Resolves `output_type` against `state`.
    ///
    /// Every field name is parsed, and in strict mode every binding checked,
    /// before any operand is allocated. An error leaves `state` without
    /// allocations or bindings from this stage.
    pub fn new(
        state: &mut CompileState,
        stage: impl Into<String>,
        output_type: TypePtr,
    ) -> Result<Self, CompileError> {
        let stage = stage.into();
        let planned = plan_fields(state, &stage, &output_type)?;

        let mut subfields = Vec::with_capacity(planned.len());
        let mut types = Vec::with_capacity(planned.len());
        let mut output_ids = OperandSet::new();
        let mut defines = IndexMap::with_capacity(planned.len());
        let mut by_name = HashMap::with_capacity(planned.len());

        for field in planned {
            let operand = state
                .resolve(field.subfield.clone(), field.ty.clone(), Some(field.name))
                .map_err(|conflict| CompileError::InconsistentBinding {
                    stage: stage.clone(),
                    conflict,
                })?;

            subfields.push(field.subfield.clone());
            types.push(field.ty.clone());
            output_ids.add(operand.id());
            by_name
                .entry(field.name.to_string())
                .or_insert_with(|| field.subfield.clone());
            defines.entry(field.subfield).or_insert(operand);
        }

        debug!(
            stage = %stage,
            fields = subfields.len(),
            outputs = output_ids.len(),
            "resolved operator"
        );

        Ok(Self {
            stage,
            output_type,
            subfields,
            types,
            output_ids,
            defines,
            by_name,
        })
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub fn output_type(&self) -> &TypePtr {
        &self.output_type
    }

    pub fn subfields(&self) -> &[Subfield] {
        &self.subfields
    }

    pub fn types(&self) -> &[TypePtr] {
        &self.types
    }

    pub fn output_ids(&self) -> &OperandSet {
        &self.output_ids
    }

    pub fn defines(&self) -> &IndexMap<Subfield, OperandRef> {
        &self.defines
    }

    pub fn operand_for(&self, subfield: &Subfield) -> Option<&OperandRef> {
        self.defines.get(subfield)
    }

    /// Operand bound to a field by its declared name, which may itself be a
    /// path such as `a.b` or `m[0]`
    pub fn operand_for_name(&self, name: &str) -> Option<&OperandRef> {
        self.by_name
            .get(name)
            .and_then(|subfield| self.defines.get(subfield))
    }
}

/// First phase of the walk: parse names and detect conflicts, no allocation.
fn plan_fields<'a>(
    state: &mut CompileState,
    stage: &str,
    output_type: &'a TypePtr,
) -> Result<Vec<PlannedField<'a>>, CompileError> {
    let row = match output_type.as_ref() {
        Type::Row(row) => row,
        other => {
            debug!(stage, ty = %other, "output type is not a row, nothing to define");
            return Ok(Vec::new());
        }
    };

    let strict = state.options().strict_bindings;
    let mut planned: Vec<PlannedField<'a>> = Vec::with_capacity(row.len());
    let mut first_in_stage: HashMap<Subfield, usize> = HashMap::new();

    for field in row.iter() {
        match field.ty.as_ref() {
            // TODO: flatten arrays and maps into element subfields once the
            // kernel layer can address them. Until then they publish nothing.
            Type::Array(_) | Type::Map { .. } => {
                debug!(stage, field = %field.name, ty = %field.ty, "skipping nested container field");
                continue;
            }
            // Row children bind one operand for the whole struct, no recursion.
            Type::Row(_) => {}
            Type::Boolean
            | Type::TinyInt
            | Type::SmallInt
            | Type::Integer
            | Type::BigInt
            | Type::Real
            | Type::Double
            | Type::Varchar
            | Type::Varbinary
            | Type::Date
            | Type::Timestamp => {}
        }

        let subfield = state
            .to_subfield(&field.name)
            .map_err(|source| CompileError::Path {
                stage: stage.to_string(),
                field: field.name.clone(),
                source,
            })?;

        if strict {
            let conflict = match first_in_stage.get(&subfield) {
                Some(&index) => {
                    let earlier = &planned[index];
                    BindingConflict::check(
                        &subfield,
                        earlier.ty,
                        Some(earlier.name),
                        &field.ty,
                        Some(&field.name),
                    )
                }
                None => state.check_binding(&subfield, &field.ty, Some(&field.name)),
            };
            if let Some(conflict) = conflict {
                state.record_conflict(&conflict);
                return Err(CompileError::InconsistentBinding {
                    stage: stage.to_string(),
                    conflict,
                });
            }
        }

        first_in_stage.entry(subfield.clone()).or_insert(planned.len());
        planned.push(PlannedField {
            name: &field.name,
            subfield,
            ty: &field.ty,
        });
    }

    Ok(planned)
}
