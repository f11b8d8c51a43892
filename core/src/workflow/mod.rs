// core/src/workflow/mod.rs

//! A small async step pipeline: named steps with `on`/`after`
//! handlers sharing one lockable context. Checkout is expressed with it.

pub mod context_data;
pub mod control;
pub mod pipeline;
pub mod step;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use pipeline::{Handler, Pipeline};
pub use step::{SkipCondition, StepDef};
