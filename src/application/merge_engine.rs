//! Graph Merge Engine
//!
//! Offline batch step fusing statically-emitted graph fragments with a
//! dynamic dump. For every regular file in a working directory whose name
//! starts with a prefix, the engine extracts the fragment's node set,
//! overlays the dump restricted to that set, wraps the result in one
//! enclosing digraph, and hands it to the rasterizer port.

use crate::domain::merge::{
    collect_node_ids, collect_usage_values, filter_edge_lines, max_usage, recolor_nodes,
    wrap_digraph,
};
use crate::ports::Rasterizer;
use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// How dynamic data is overlaid onto a static fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MergeMode {
    /// Append the dump's edge records whose endpoints both appear in the
    /// fragment.
    Edges,
    /// Recolor node declarations by usage intensity, normalized against
    /// the hottest node in the fragment.
    Usage,
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeMode::Edges => write!(f, "edges"),
            MergeMode::Usage => write!(f, "usage"),
        }
    }
}

/// Batch merger over one working directory.
pub struct GraphMergeEngine<'a> {
    mode: MergeMode,
    rasterizer: &'a dyn Rasterizer,
}

impl<'a> GraphMergeEngine<'a> {
    pub fn new(mode: MergeMode, rasterizer: &'a dyn Rasterizer) -> Self {
        Self { mode, rasterizer }
    }

    /// Merge `dump_path` into every matching file under `dir`.
    ///
    /// With an `output_prefix` each result lands in a new
    /// `<output_prefix><name>.dot` file; without one the static file is
    /// rewritten in place. Returns the number of files processed; zero
    /// matches is not an error.
    pub fn run(
        &self,
        dump_path: &Path,
        dir: &Path,
        prefix: &str,
        output_prefix: Option<&str>,
    ) -> Result<usize> {
        let dump = fs::read_to_string(dump_path)
            .with_context(|| format!("can't read dynamic dump {}", dump_path.display()))?;

        // Snapshot the matches up front so freshly written outputs are
        // never picked up as inputs of the same batch.
        let targets = self.matching_files(dir, prefix)?;

        for path in &targets {
            let name = path
                .file_name()
                .with_context(|| format!("no file name in {}", path.display()))?
                .to_string_lossy()
                .into_owned();
            let out_path = match output_prefix {
                Some(out_prefix) => dir.join(format!("{out_prefix}{name}.dot")),
                None => path.clone(),
            };

            self.merge_file(path, &dump, &out_path)
                .with_context(|| format!("can't merge {}", path.display()))?;
            self.rasterizer.render(&out_path)?;
        }

        Ok(targets.len())
    }

    fn matching_files(&self, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
        let mut targets = Vec::new();
        for entry in
            fs::read_dir(dir).with_context(|| format!("can't scan directory {}", dir.display()))?
        {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if entry.file_name().to_string_lossy().starts_with(prefix) {
                targets.push(entry.path());
            }
        }
        targets.sort();
        Ok(targets)
    }

    fn merge_file(&self, static_path: &Path, dump: &str, out_path: &Path) -> Result<()> {
        let static_text = fs::read_to_string(static_path)
            .with_context(|| format!("can't read static graph {}", static_path.display()))?;
        let nodes = collect_node_ids(&static_text);

        let merged = match self.mode {
            MergeMode::Edges => {
                let kept = filter_edge_lines(dump, &nodes);
                wrap_digraph(&[static_text.as_str(), &kept.join("\n")])
            }
            MergeMode::Usage => {
                let values = collect_usage_values(dump, &nodes);
                let max = max_usage(&values)
                    .with_context(|| format!("empty dynamic dump for {}", static_path.display()))?;
                wrap_digraph(&[&recolor_nodes(&static_text, &values, max)])
            }
        };

        fs::write(out_path, merged)
            .with_context(|| format!("can't write merged graph {}", out_path.display()))
    }
}
