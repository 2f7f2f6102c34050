// Domain model for Tracelens: graph primitives, the three trace
// aggregators, and the pure static/dynamic merge algorithms.

pub mod edge_counter;
pub mod graph;
pub mod memory_tracker;
pub mod merge;
pub mod usage_counter;
