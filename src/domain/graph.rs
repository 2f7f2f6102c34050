//! Graph Primitives
//!
//! Shared vocabulary for the writers and aggregators: node identifiers,
//! the fixed color palette, and DOT label escaping.

/// Stable identifier of one structural program element for one run.
///
/// Ids are assigned by the instrumentation side (derived from the identity
/// of the traced entity); this crate only requires them to be unique per
/// graph and stable for the duration of a run.
pub type NodeId = u64;

/// Memory address observed by the allocation probes.
pub type Address = u64;

/// Fixed palette used by the graph writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Blue,
    Black,
    Gray,
}

impl Color {
    /// Graphviz color name.
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Black => "black",
            Color::Gray => "gray",
        }
    }
}

/// Escape a label for use inside a double-quoted DOT attribute.
pub fn escape_label(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_label() {
        assert_eq!(escape_label("plain"), "plain");
        assert_eq!(escape_label("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_label("a\\b"), "a\\\\b");
        assert_eq!(escape_label("two\nlines"), "two\\nlines");
    }

    #[test]
    fn test_color_names() {
        assert_eq!(Color::Red.as_str(), "red");
        assert_eq!(Color::Gray.as_str(), "gray");
    }
}
