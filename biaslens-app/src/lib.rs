//! Wiring for the `biaslens` command-line tool.
//!
//! - End-to-end analysis run and its outcome (`pipeline`)
//! - Component construction from configuration (`tether`)

pub mod pipeline;
pub mod tether;

pub use pipeline::{Pipeline, PipelineRun, PipelineStatus};
pub use tether::{CaptureMode, build_from_config};
