// Port traits seaming the merge pipeline to external collaborators.

use anyhow::Result;
use std::path::Path;

/// Renders a merged DOT file into an image.
///
/// Implemented by the external `dot` invocation in the infrastructure
/// layer; tests substitute a recording stub.
pub trait Rasterizer {
    fn render(&self, dot_file: &Path) -> Result<()>;
}
