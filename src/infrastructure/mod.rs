// Infrastructure implementations for Tracelens: the incremental DOT
// writer, output-path resolution, and the external `dot` rasterizer.

pub mod graph_writer;
pub mod output;
pub mod rasterizer;

pub use graph_writer::{GraphDocument, Subgraph};
pub use rasterizer::DotRasterizer;
