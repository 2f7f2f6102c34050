//! Memory Lifetime Tracker
//!
//! Tracks, per dynamically-allocated address, the ordered node ids that
//! touched it within one allocation generation.
//!
//! Allocators reuse address values across unrelated allocations, so each
//! release closes the current generation with an explicit boundary entry.
//! The dump draws an edge between adjacent history entries only when no
//! boundary sits between them; the tail of one object's lifetime is never
//! linked to the head of an unrelated later object at the same address.

use crate::domain::graph::{Address, Color, NodeId};
use anyhow::{bail, Result};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// One entry in an address's touch history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEntry {
    /// A node touched the allocation.
    Touch(NodeId),
    /// The allocation was released; entries on either side belong to
    /// different generations.
    GenerationBoundary,
}

#[derive(Debug, Default)]
struct MemoryRecord {
    live: bool,
    owner: Option<NodeId>,
    history: Vec<HistoryEntry>,
}

/// Per-address ownership history across allocation/release generations.
#[derive(Debug, Default)]
pub struct MemoryLifetimeTracker {
    records: BTreeMap<Address, MemoryRecord>,
}

impl MemoryLifetimeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation at `address`, owned by `node`.
    ///
    /// Allocating an address that is already live indicates an
    /// instrumentation bug and fails loudly.
    pub fn record_allocation(&mut self, node: NodeId, address: Address) -> Result<()> {
        let record = self.records.entry(address).or_default();
        if record.live {
            bail!("allocation at address {address:#x} which is already live (node{node})");
        }

        record.live = true;
        record.owner = Some(node);
        record.history.push(HistoryEntry::Touch(node));
        Ok(())
    }

    /// Record that `node` touched `address`.
    ///
    /// Probes may call this for every pointer-typed value unconditionally,
    /// so an address that is not currently tracked is silently ignored.
    pub fn record_touch(&mut self, node: NodeId, address: Address) {
        if let Some(record) = self.records.get_mut(&address) {
            if record.live {
                record.owner = Some(node);
                record.history.push(HistoryEntry::Touch(node));
            }
        }
    }

    /// Close the current generation at `address`, released by `node`.
    ///
    /// Releasing an address that is not live indicates an instrumentation
    /// bug and fails loudly.
    pub fn record_release(&mut self, node: NodeId, address: Address) -> Result<()> {
        let Some(record) = self.records.get_mut(&address) else {
            bail!("release of untracked address {address:#x} by node{node}");
        };
        if !record.live {
            bail!("release of address {address:#x} which is not live (node{node})");
        }

        record.live = false;
        record.owner = None;
        record.history.push(HistoryEntry::Touch(node));
        record.history.push(HistoryEntry::GenerationBoundary);
        Ok(())
    }

    /// Current owner of a live address, if any.
    pub fn owner(&self, address: Address) -> Option<NodeId> {
        self.records.get(&address).filter(|r| r.live).and_then(|r| r.owner)
    }

    /// Write one `node<a> -> node<b>` edge per adjacent history pair that
    /// is not separated by a generation boundary, for every tracked
    /// address in ascending address order.
    pub fn write_dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for record in self.records.values() {
            for pair in record.history.windows(2) {
                if let [HistoryEntry::Touch(from), HistoryEntry::Touch(to)] = *pair {
                    writeln!(
                        out,
                        "node{from} -> node{to} [color=\"{}\"];",
                        Color::Green.as_str()
                    )?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dump_string(tracker: &MemoryLifetimeTracker) -> String {
        let mut buf = Vec::new();
        tracker.write_dump(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_lifetime_chain_produces_adjacent_edges() {
        let mut tracker = MemoryLifetimeTracker::new();
        tracker.record_allocation(1, 0x1000).unwrap();
        tracker.record_touch(2, 0x1000);
        tracker.record_release(3, 0x1000).unwrap();

        assert_eq!(
            dump_string(&tracker),
            "node1 -> node2 [color=\"green\"];\nnode2 -> node3 [color=\"green\"];\n"
        );
    }

    #[test]
    fn test_no_edge_across_generation_boundary() {
        let mut tracker = MemoryLifetimeTracker::new();
        tracker.record_allocation(1, 0x1000).unwrap();
        tracker.record_touch(2, 0x1000);
        tracker.record_release(3, 0x1000).unwrap();
        // Allocator reuses the address for an unrelated object.
        tracker.record_allocation(4, 0x1000).unwrap();

        let dump = dump_string(&tracker);
        assert!(dump.contains("node1 -> node2"));
        assert!(dump.contains("node2 -> node3"));
        assert!(!dump.contains("node4"), "fresh generation leaked into dump: {dump}");
    }

    #[test]
    fn test_touch_on_untracked_address_is_noop() {
        let mut tracker = MemoryLifetimeTracker::new();
        tracker.record_touch(1, 0xdead);
        assert_eq!(dump_string(&tracker), "");
    }

    #[test]
    fn test_touch_after_release_is_noop() {
        let mut tracker = MemoryLifetimeTracker::new();
        tracker.record_allocation(1, 0x20).unwrap();
        tracker.record_release(2, 0x20).unwrap();
        tracker.record_touch(9, 0x20);

        let dump = dump_string(&tracker);
        assert!(!dump.contains("node9"));
    }

    #[test]
    fn test_double_allocation_fails() {
        let mut tracker = MemoryLifetimeTracker::new();
        tracker.record_allocation(1, 0x30).unwrap();
        assert!(tracker.record_allocation(2, 0x30).is_err());
    }

    #[test]
    fn test_release_of_dead_address_fails() {
        let mut tracker = MemoryLifetimeTracker::new();
        assert!(tracker.record_release(1, 0x40).is_err());

        tracker.record_allocation(1, 0x40).unwrap();
        tracker.record_release(2, 0x40).unwrap();
        assert!(tracker.record_release(3, 0x40).is_err());
    }

    #[test]
    fn test_touch_updates_owner() {
        let mut tracker = MemoryLifetimeTracker::new();
        tracker.record_allocation(1, 0x50).unwrap();
        assert_eq!(tracker.owner(0x50), Some(1));
        tracker.record_touch(2, 0x50);
        assert_eq!(tracker.owner(0x50), Some(2));
        tracker.record_release(3, 0x50).unwrap();
        assert_eq!(tracker.owner(0x50), None);
    }
}
