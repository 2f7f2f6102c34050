//! Output Path Resolution
//!
//! Each end-of-run artifact has a dedicated environment variable
//! overriding its hard-coded default filename.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Edge traversal dump.
pub const EDGE_DUMP_ENV: &str = "TRACE_EDGE_DUMP";
pub const EDGE_DUMP_DEFAULT: &str = "n_passes_edges.dot";

/// Node usage dump.
pub const USAGE_DUMP_ENV: &str = "TRACE_USAGE_DUMP";
pub const USAGE_DUMP_DEFAULT: &str = "node_usages.dot";

/// Memory lifetime dump.
pub const MEMORY_DUMP_ENV: &str = "TRACE_MEMORY_DUMP";
pub const MEMORY_DUMP_DEFAULT: &str = "memory_flow.dot";

/// Static def-use graph.
pub const DEF_USE_GRAPH_ENV: &str = "TRACE_DEF_USE_GRAPH";
pub const DEF_USE_GRAPH_DEFAULT: &str = "def_use.dot";

/// Resolve an artifact path: the environment override when set, the
/// hard-coded fallback otherwise.
pub fn resolve_output_path(env_var: &str, fallback: &str) -> String {
    std::env::var(env_var).unwrap_or_else(|_| fallback.to_string())
}

/// Static control-flow graphs are emitted per traced module; path
/// separators in the module name are flattened into the filename.
pub fn control_flow_file_name(module_name: &str) -> String {
    format!("control_flow_{}.dot", module_name.replace('/', "_"))
}

/// Open a buffered file sink. Failing to open is fatal before any
/// content is written.
pub fn create_sink(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)
        .with_context(|| format!("can't open output file {}", path.display()))?;
    Ok(BufWriter::new(file))
}
