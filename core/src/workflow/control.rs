// core/src/workflow/control.rs

//! Flow signals returned by step handlers and the outcome of a whole run.

/// Returned by a handler to continue with the next handler/step or halt the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// Halts the run; no later handler in this or any following step executes.
  Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step ran (or was skipped) without a handler stopping the run.
  Completed,
  /// A handler returned `PipelineControl::Stop`.
  Stopped,
}
