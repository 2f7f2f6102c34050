//! Trace Run Context
//!
//! One explicitly constructed object holding the three event aggregators
//! for the duration of an instrumented run. The integrator creates it at
//! run start, routes every probe call through it, and drains it exactly
//! once at run end; there is no reset.
//!
//! The context is not internally synchronized. If the traced target is
//! multi-threaded, the integrator must serialize all probe calls
//! externally, e.g. behind one mutex.

use crate::domain::edge_counter::EdgeTraversalAggregator;
use crate::domain::graph::{Address, NodeId};
use crate::domain::memory_tracker::MemoryLifetimeTracker;
use crate::domain::usage_counter::NodeUsageAggregator;
use crate::infrastructure::output::{
    create_sink, resolve_output_path, EDGE_DUMP_DEFAULT, EDGE_DUMP_ENV, MEMORY_DUMP_DEFAULT,
    MEMORY_DUMP_ENV, USAGE_DUMP_DEFAULT, USAGE_DUMP_ENV,
};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Aggregation state for one concrete execution.
#[derive(Debug, Default)]
pub struct TraceRun {
    edges: EdgeTraversalAggregator,
    usages: NodeUsageAggregator,
    memory: MemoryLifetimeTracker,
}

// The probe methods below are a stable contract with the external
// instrumentation component: names, parameter order, and types must not
// change between releases.
impl TraceRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the origin of a control-flow transition.
    pub fn start_edge(&mut self, from: NodeId) {
        self.edges.prepare(from);
    }

    /// Record the destination of the staged transition; a no-op without
    /// a staged origin.
    pub fn finish_edge(&mut self, to: NodeId) {
        self.edges.commit(to);
    }

    /// Record one generic touch of `node`.
    pub fn add_node_usage(&mut self, node: NodeId) {
        self.usages.add_usage(node);
    }

    /// Begin tracking a fresh allocation at `address`, owned by `node`.
    pub fn add_memory_alloc(&mut self, node: NodeId, address: Address) -> Result<()> {
        self.memory.record_allocation(node, address)
    }

    /// Record a touch of `address` when it is tracked; silently ignored
    /// otherwise, so probes may report every pointer-typed value.
    pub fn touch_memory_if_tracked(&mut self, node: NodeId, address: Address) {
        self.memory.record_touch(node, address);
    }

    /// Stop tracking `address`, released by `node`.
    pub fn remove_memory(&mut self, node: NodeId, address: Address) -> Result<()> {
        self.memory.record_release(node, address)
    }

    pub fn edges(&self) -> &EdgeTraversalAggregator {
        &self.edges
    }

    pub fn usages(&self) -> &NodeUsageAggregator {
        &self.usages
    }

    pub fn memory(&self) -> &MemoryLifetimeTracker {
        &self.memory
    }

    /// Dump the edge traversal counts to `path`.
    pub fn dump_edges(&self, path: &Path) -> Result<()> {
        let mut sink = create_sink(path)?;
        self.edges
            .write_dump(&mut sink)
            .and_then(|()| sink.flush())
            .with_context(|| format!("can't write edge dump to {}", path.display()))
    }

    /// Dump the node usage counts to `path`.
    pub fn dump_usages(&self, path: &Path) -> Result<()> {
        let mut sink = create_sink(path)?;
        self.usages
            .write_dump(&mut sink)
            .and_then(|()| sink.flush())
            .with_context(|| format!("can't write usage dump to {}", path.display()))
    }

    /// Dump the memory lifetime edges to `path`.
    pub fn dump_memory(&self, path: &Path) -> Result<()> {
        let mut sink = create_sink(path)?;
        self.memory
            .write_dump(&mut sink)
            .and_then(|()| sink.flush())
            .with_context(|| format!("can't write memory dump to {}", path.display()))
    }

    /// Drain every aggregator to its environment-resolved default path.
    pub fn dump_all(&self) -> Result<()> {
        self.dump_edges(Path::new(&resolve_output_path(
            EDGE_DUMP_ENV,
            EDGE_DUMP_DEFAULT,
        )))?;
        self.dump_usages(Path::new(&resolve_output_path(
            USAGE_DUMP_ENV,
            USAGE_DUMP_DEFAULT,
        )))?;
        self.dump_memory(Path::new(&resolve_output_path(
            MEMORY_DUMP_ENV,
            MEMORY_DUMP_DEFAULT,
        )))
    }
}
