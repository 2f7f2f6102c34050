//! Static/Dynamic Merge Algorithms
//!
//! Pure functions over strings and maps, decoupled from file I/O so the
//! merge engine stays directly testable: node-token extraction, edge-line
//! filtering, usage collection, and intensity-to-color mapping.

use crate::domain::graph::NodeId;
use anyhow::{bail, Result};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

fn node_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"node(\d+)").unwrap())
}

fn edge_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*node(\d+)\s*->\s*node(\d+)").unwrap())
}

fn usage_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*node(\d+)\s+(\d+)\s*$").unwrap())
}

fn fillcolor_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^(.*?node(\d+).*?fillcolor=")([^"]*)(".*)$"#).unwrap())
}

/// Collect every `node<id>` token appearing anywhere in `text`.
///
/// This is a deliberate over-approximation of graph membership: an id
/// counts as present if its token occurs in any line, declaration or not.
pub fn collect_node_ids(text: &str) -> HashSet<NodeId> {
    node_token_re()
        .captures_iter(text)
        .filter_map(|cap| cap[1].parse().ok())
        .collect()
}

/// Parse a `node<from> -> node<to>` edge record, if the line is one.
pub fn parse_edge_line(line: &str) -> Option<(NodeId, NodeId)> {
    let cap = edge_line_re().captures(line)?;
    Some((cap[1].parse().ok()?, cap[2].parse().ok()?))
}

/// Keep the edge records of `dump` whose endpoints both appear in `nodes`.
pub fn filter_edge_lines(dump: &str, nodes: &HashSet<NodeId>) -> Vec<String> {
    dump.lines()
        .filter(|line| match parse_edge_line(line) {
            Some((from, to)) => nodes.contains(&from) && nodes.contains(&to),
            None => false,
        })
        .map(str::to_string)
        .collect()
}

/// Collect `node<id> <count>` records of `dump` restricted to ids in
/// `nodes`. A later record for the same id wins.
pub fn collect_usage_values(dump: &str, nodes: &HashSet<NodeId>) -> BTreeMap<NodeId, u64> {
    let mut values = BTreeMap::new();
    for line in dump.lines() {
        if let Some(cap) = usage_line_re().captures(line) {
            let (Ok(node), Ok(value)) = (cap[1].parse::<NodeId>(), cap[2].parse::<u64>()) else {
                continue;
            };
            if nodes.contains(&node) {
                values.insert(node, value);
            }
        }
    }
    values
}

/// Largest usage value, or an error when no value was collected.
///
/// The normalization ratio is undefined over an empty dump, so this fails
/// fast instead of letting a garbage ratio reach the output.
pub fn max_usage(values: &BTreeMap<NodeId, u64>) -> Result<u64> {
    match values.values().max() {
        Some(&max) => Ok(max),
        None => bail!("dynamic dump contributed no usage values"),
    }
}

/// Map an intensity ratio in [0, 1] to a `#RRGG00` color: red grows with
/// the ratio, green shrinks with it (red = hot, green = cold).
pub fn interpolate_color(ratio: f64) -> String {
    let red = (255.0 * ratio).clamp(0.0, 255.0) as u8;
    let green = (255.0 * (1.0 - ratio)).clamp(0.0, 255.0) as u8;
    format!("#{red:02X}{green:02X}00")
}

/// Render weight for an intensity ratio in [0, 1].
pub fn pen_width(ratio: f64) -> f64 {
    1.0 + 4.0 * ratio
}

/// Rewrite `fillcolor` attributes of node declarations in `text`.
///
/// A line declaring `node<id>` with a `fillcolor` attribute gets its color
/// replaced by the interpolation of `values[id] / max`; every other line
/// passes through unchanged.
pub fn recolor_nodes(text: &str, values: &BTreeMap<NodeId, u64>, max: u64) -> String {
    let mut rewritten = String::new();
    for line in text.lines() {
        let replaced = fillcolor_re().captures(line).and_then(|cap| {
            let id: NodeId = cap[2].parse().ok()?;
            let value = values.get(&id)?;
            let color = interpolate_color(*value as f64 / max as f64);
            Some(format!("{}{}{}", &cap[1], color, &cap[4]))
        });

        match replaced {
            Some(new_line) => rewritten.push_str(&new_line),
            None => rewritten.push_str(line),
        }
        rewritten.push('\n');
    }
    rewritten
}

/// Assemble a top-level digraph from pre-rendered body sections.
pub fn wrap_digraph(sections: &[&str]) -> String {
    let mut out = String::from("digraph G {\nrankdir=TB;\n");
    for section in sections {
        out.push_str(section);
        if !section.is_empty() && !section.ends_with('\n') {
            out.push('\n');
        }
    }
    out.push_str("}\n");
    out
}
