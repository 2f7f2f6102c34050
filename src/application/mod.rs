// Application layer: the probe-facing run context and the offline
// static/dynamic merge engine.

pub mod merge_engine;
pub mod trace_run;

pub use merge_engine::{GraphMergeEngine, MergeMode};
pub use trace_run::TraceRun;
