//! Wave compile - operand resolution for GPU pipelines
//!
//! Turns each stage's logical output row into flat, id-addressed operands.
//! All identities are assigned sequentially while operators are constructed
//! and are frozen before execution starts.

mod allocator;
mod definitions;
mod error;
mod operand;
mod operator;
mod pipeline;
mod state;

pub use allocator::OperandAllocator;
pub use definitions::{BindingConflict, DefinitionTable};
pub use error::CompileError;
pub use operand::{Operand, OperandId, OperandRef, OperandSet};
pub use operator::PipelineOperator;
pub use pipeline::{
    compile_pipeline, CompiledPipeline, OperandSummary, PipelineCompiler, PipelineSummary,
    StageDef, StageSummary,
};
pub use state::{CompileOptions, CompileState};
