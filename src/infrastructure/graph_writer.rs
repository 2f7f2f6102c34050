//! Incremental DOT Writer
//!
//! Streams one nested directed-graph artifact line by line, with no full
//! in-memory buffering. Header and footer are independently optional
//! because per-module fragments are later concatenated by the merge stage
//! into one enclosing graph.

use crate::domain::graph::{escape_label, Color, NodeId};
use std::io::{self, Write};
use std::ops::{Deref, DerefMut};

/// Incremental writer for one graph artifact.
///
/// Owns its sink exclusively; two documents can never share one sink.
/// Consuming [`close`](Self::close) makes writes after close unrepresentable.
#[derive(Debug)]
pub struct GraphDocument<W: Write> {
    out: W,
    with_footer: bool,
    closed: bool,
}

impl<W: Write> GraphDocument<W> {
    /// Begin a document on `out`, writing the enclosing header when
    /// `with_header` is set.
    pub fn create(mut out: W, with_header: bool, with_footer: bool) -> io::Result<Self> {
        if with_header {
            writeln!(out, "digraph G {{")?;
            writeln!(out, "rankdir=TB;")?;
        }

        Ok(Self {
            out,
            with_footer,
            closed: false,
        })
    }

    /// Write one node declaration line, immediately.
    pub fn add_node(&mut self, id: NodeId, label: &str, color: Color) -> io::Result<()> {
        writeln!(
            self.out,
            "node{id} [label=\"{}\", color=\"{}\"];",
            escape_label(label),
            color.as_str()
        )
    }

    /// Write one edge declaration line, immediately.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, color: Color) -> io::Result<()> {
        writeln!(
            self.out,
            "node{from} -> node{to} [color=\"{}\"];",
            color.as_str()
        )
    }

    /// Open a nested cluster. The returned scope derefs to the document
    /// for nested writes and emits the closing marker when it drops, so
    /// clusters close in strict LIFO order even on unwind.
    pub fn subgraph(&mut self, id: NodeId, label: &str) -> io::Result<Subgraph<'_, W>> {
        writeln!(self.out, "subgraph cluster_{id} {{")?;
        writeln!(self.out, "label=\"{}\";", escape_label(label))?;
        Ok(Subgraph { doc: self })
    }

    /// Write the footer when configured and flush the sink.
    pub fn close(mut self) -> io::Result<()> {
        self.closed = true;
        if self.with_footer {
            writeln!(self.out, "}}")?;
        }
        self.out.flush()
    }
}

impl<W: Write> Drop for GraphDocument<W> {
    fn drop(&mut self) {
        // Best-effort close for documents abandoned on unwind.
        if !self.closed {
            if self.with_footer {
                let _ = writeln!(self.out, "}}");
            }
            let _ = self.out.flush();
        }
    }
}

/// Scoped handle for one open cluster.
#[derive(Debug)]
pub struct Subgraph<'a, W: Write> {
    doc: &'a mut GraphDocument<W>,
}

impl<W: Write> Deref for Subgraph<'_, W> {
    type Target = GraphDocument<W>;

    fn deref(&self) -> &Self::Target {
        self.doc
    }
}

impl<W: Write> DerefMut for Subgraph<'_, W> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.doc
    }
}

impl<W: Write> Drop for Subgraph<'_, W> {
    fn drop(&mut self) {
        let _ = writeln!(self.doc.out, "}}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::merge::collect_node_ids;

    #[test]
    fn test_nodes_and_edges_in_call_order() {
        let mut buf = Vec::new();
        let mut doc = GraphDocument::create(&mut buf, true, true).unwrap();
        doc.add_node(1, "alpha", Color::Black).unwrap();
        doc.add_node(2, "beta", Color::Red).unwrap();
        doc.add_edge(1, 2, Color::Blue).unwrap();
        doc.close().unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "digraph G {\n\
             rankdir=TB;\n\
             node1 [label=\"alpha\", color=\"black\"];\n\
             node2 [label=\"beta\", color=\"red\"];\n\
             node1 -> node2 [color=\"blue\"];\n\
             }\n"
        );
    }

    #[test]
    fn test_nested_subgraphs_close_in_lifo_order() {
        let mut buf = Vec::new();
        let mut doc = GraphDocument::create(&mut buf, true, true).unwrap();
        {
            let mut func = doc.subgraph(10, "func").unwrap();
            func.add_node(10, "func", Color::Gray).unwrap();
            {
                let mut block = func.subgraph(11, "block").unwrap();
                block.add_node(12, "instr", Color::Gray).unwrap();
            }
            func.add_node(13, "tail", Color::Gray).unwrap();
        }
        doc.close().unwrap();

        let expected = "digraph G {\n\
             rankdir=TB;\n\
             subgraph cluster_10 {\n\
             label=\"func\";\n\
             node10 [label=\"func\", color=\"gray\"];\n\
             subgraph cluster_11 {\n\
             label=\"block\";\n\
             node12 [label=\"instr\", color=\"gray\"];\n\
             }\n\
             node13 [label=\"tail\", color=\"gray\"];\n\
             }\n\
             }\n";
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }

    #[test]
    fn test_labels_are_escaped() {
        let mut buf = Vec::new();
        let mut doc = GraphDocument::create(&mut buf, false, false).unwrap();
        {
            let mut sub = doc.subgraph(1, "outer \"quoted\"").unwrap();
            sub.add_node(2, "say \"hi\"", Color::Black).unwrap();
        }
        doc.close().unwrap();

        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("label=\"outer \\\"quoted\\\"\";"));
        assert!(out.contains("node2 [label=\"say \\\"hi\\\"\", color=\"black\"];"));
    }

    #[test]
    fn test_headerless_fragment_has_no_enclosing_markers() {
        let mut buf = Vec::new();
        let mut doc = GraphDocument::create(&mut buf, false, false).unwrap();
        doc.add_node(1, "a", Color::Black).unwrap();
        doc.close().unwrap();

        assert_eq!(String::from_utf8(buf).unwrap(), "node1 [label=\"a\", color=\"black\"];\n");
    }

    #[test]
    fn test_empty_document_is_minimal_and_node_free() {
        let mut buf = Vec::new();
        let doc = GraphDocument::create(&mut buf, true, true).unwrap();
        doc.close().unwrap();

        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "digraph G {\nrankdir=TB;\n}\n");
        assert!(collect_node_ids(&out).is_empty());
    }

    #[test]
    fn test_drop_emits_footer_for_abandoned_document() {
        let mut buf = Vec::new();
        {
            let mut doc = GraphDocument::create(&mut buf, true, true).unwrap();
            doc.add_node(1, "a", Color::Black).unwrap();
            // Dropped without close, as on an abnormal unwind.
        }
        assert!(String::from_utf8(buf).unwrap().ends_with("}\n"));
    }
}
