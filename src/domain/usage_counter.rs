//! Node Usage Aggregator
//!
//! Counts generic per-node "touch" events reported by injected probes.

use crate::domain::graph::NodeId;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Per-node touch counter.
#[derive(Debug, Default)]
pub struct NodeUsageAggregator {
    usages: BTreeMap<NodeId, u64>,
}

impl NodeUsageAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_usage(&mut self, node: NodeId) {
        *self.usages.entry(node).or_insert(0) += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.usages.is_empty()
    }

    /// Write one `node<id> <count>` line per touched node, ascending by id.
    pub fn write_dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (&node, &count) in &self.usages {
            writeln!(out, "node{node} {count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_counts_accumulate() {
        let mut agg = NodeUsageAggregator::new();
        agg.add_usage(3);
        agg.add_usage(1);
        agg.add_usage(3);

        let mut buf = Vec::new();
        agg.write_dump(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "node1 1\nnode3 2\n");
    }

    #[test]
    fn test_empty_dump_writes_nothing() {
        let agg = NodeUsageAggregator::new();
        let mut buf = Vec::new();
        agg.write_dump(&mut buf).unwrap();
        assert!(buf.is_empty());
    }
}
