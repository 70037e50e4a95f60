//! Pipeline compilation driver
//!
//! Builds operators in producer-before-consumer order against one
//! [`CompileState`] and exposes what downstream kernel generation reads.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;
use wave_ir::TypePtr;

use crate::error::CompileError;
use crate::operand::OperandId;
use crate::operator::PipelineOperator;
use crate::state::{CompileOptions, CompileState};

/// One stage of a logical plan with its declared output schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDef {
    pub name: String,
    pub output: TypePtr,
}

impl StageDef {
    pub fn new(name: impl Into<String>, output: TypePtr) -> Self {
        Self {
            name: name.into(),
            output,
        }
    }
}

/// Incremental builder over a single compilation context
#[derive(Debug, Default)]
pub struct PipelineCompiler {
    state: CompileState,
    operators: Vec<PipelineOperator>,
}

impl PipelineCompiler {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            state: CompileState::with_options(options),
            operators: Vec::new(),
        }
    }

    pub fn add_stage(
        &mut self,
        stage: impl Into<String>,
        output: TypePtr,
    ) -> Result<&PipelineOperator, CompileError> {
        let operator = PipelineOperator::new(&mut self.state, stage, output)?;
        self.operators.push(operator);
        let index = self.operators.len() - 1;
        Ok(&self.operators[index])
    }

    pub fn state(&self) -> &CompileState {
        &self.state
    }

    pub fn finish(self) -> CompiledPipeline {
        info!(
            stages = self.operators.len(),
            operands = self.state.operands().len(),
            conflicts = self.state.conflicts().len(),
            "pipeline compiled"
        );
        CompiledPipeline {
            state: self.state,
            operators: self.operators,
        }
    }
}

/// Compile every stage in order; the first failure aborts the whole pipeline.
pub fn compile_pipeline(
    stages: &[StageDef],
    options: CompileOptions,
) -> Result<CompiledPipeline, CompileError> {
    let mut compiler = PipelineCompiler::new(options);
    for stage in stages {
        compiler.add_stage(stage.name.clone(), stage.output.clone())?;
    }
    Ok(compiler.finish())
}

/// Frozen result of a compilation
#[derive(Debug)]
pub struct CompiledPipeline {
    state: CompileState,
    operators: Vec<PipelineOperator>,
}

impl CompiledPipeline {
    pub fn operators(&self) -> &[PipelineOperator] {
        &self.operators
    }

    /// Operator compiled for `stage`; the first one wins if names repeat
    pub fn operator(&self, stage: &str) -> Result<&PipelineOperator, CompileError> {
        self.operators
            .iter()
            .find(|op| op.stage() == stage)
            .ok_or_else(|| CompileError::UnknownStage(stage.to_string()))
    }

    pub fn state(&self) -> &CompileState {
        &self.state
    }

    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            stages: self
                .operators
                .iter()
                .map(|op| StageSummary {
                    stage: op.stage().to_string(),
                    subfields: op.subfields().iter().map(|s| s.to_string()).collect(),
                    types: op.types().iter().map(|t| t.to_string()).collect(),
                    output_ids: op.output_ids().to_vec(),
                })
                .collect(),
            operands: self
                .state
                .operands()
                .iter()
                .map(|op| OperandSummary {
                    id: op.id(),
                    ty: op.ty().to_string(),
                    label: op.label().map(str::to_string),
                })
                .collect(),
            definitions: self
                .state
                .definitions()
                .iter()
                .map(|(subfield, op)| (subfield.to_string(), op.id()))
                .collect(),
        }
    }

    /// SHA-256 of the summary; identical inputs always hash identically
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(&self.summary()).expect("summary should always serialize");
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    pub stages: Vec<StageSummary>,
    pub operands: Vec<OperandSummary>,
    pub definitions: Vec<(String, OperandId)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageSummary {
    pub stage: String,
    pub subfields: Vec<String>,
    pub types: Vec<String>,
    pub output_ids: Vec<OperandId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperandSummary {
    pub id: OperandId,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wave_ir::Type;

    fn stages() -> Vec<StageDef> {
        vec![
            StageDef::new("scan", Type::row([("x", Type::Integer.into_ptr())])),
            StageDef::new(
                "project",
                Type::row([("x", Type::Integer.into_ptr()), ("y", Type::Integer.into_ptr())]),
            ),
        ]
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let first = compile_pipeline(&stages(), CompileOptions::default()).unwrap();
        let second = compile_pipeline(&stages(), CompileOptions::default()).unwrap();

        assert_eq!(first.summary(), second.summary());
        assert_eq!(first.fingerprint(), second.fingerprint());
        assert_eq!(first.fingerprint().len(), 64);
    }

    #[test]
    fn test_unknown_stage() {
        let compiled = compile_pipeline(&stages(), CompileOptions::default()).unwrap();
        assert!(compiled.operator("project").is_ok());
        assert!(matches!(
            compiled.operator("sink"),
            Err(CompileError::UnknownStage(name)) if name == "sink"
        ));
    }

    #[test]
    fn test_summary_lists_definitions_in_registration_order() {
        let compiled = compile_pipeline(&stages(), CompileOptions::default()).unwrap();
        let summary = compiled.summary();

        let names: Vec<_> = summary.definitions.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(summary.operands.len(), 2);
        assert_eq!(summary.stages[1].types, vec!["INTEGER", "INTEGER"]);
    }
}
