//! Edge Traversal Aggregator
//!
//! Counts directed node-pair transitions reported by injected probes.
//!
//! Many probe sites can observe only one endpoint of a transition at the
//! point they execute, so recording is split into a two-phase protocol:
//! `prepare` stages the origin, `commit` records the transition. The two
//! calls are placed independently by the instrumentation side and meet
//! here without passing state between call sites.

use crate::domain::graph::NodeId;
use crate::domain::merge::{interpolate_color, pen_width};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Counts (from, to) traversals via the prepare/commit protocol.
#[derive(Debug, Default)]
pub struct EdgeTraversalAggregator {
    counts: BTreeMap<(NodeId, NodeId), u64>,
    staged_from: Option<NodeId>,
}

impl EdgeTraversalAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the origin of the next transition. An unconsumed stage is
    /// overwritten: last write wins.
    pub fn prepare(&mut self, from: NodeId) {
        self.staged_from = Some(from);
    }

    /// Record a transition from the staged origin to `to` and clear the
    /// stage. With no staged origin this is a silent no-op, a deliberate
    /// tolerance for partial instrumentation coverage.
    pub fn commit(&mut self, to: NodeId) {
        if let Some(from) = self.staged_from.take() {
            *self.counts.entry((from, to)).or_insert(0) += 1;
        }
    }

    /// Total number of recorded transitions.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Write one `node<f> -> node<t> [label="<count>"];` line per recorded
    /// pair, in ascending (from, to) order.
    pub fn write_dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (&(from, to), &count) in &self.counts {
            writeln!(out, "node{from} -> node{to} [label=\"{count}\"];")?;
        }
        Ok(())
    }

    /// Like [`write_dump`](Self::write_dump), but colors every edge by its
    /// count relative to the hottest edge (red = hot, green = cold) and
    /// scales the pen width with the same ratio. An empty aggregator
    /// writes nothing.
    pub fn write_dump_colored<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Some(&max) = self.counts.values().max() else {
            return Ok(());
        };

        for (&(from, to), &count) in &self.counts {
            let ratio = count as f64 / max as f64;
            writeln!(
                out,
                "node{from} -> node{to} [label=\"{count}\", color=\"{}\", penwidth={:.2}];",
                interpolate_color(ratio),
                pen_width(ratio),
            )?;
        }
        Ok(())
    }
}
