//! Graphviz Rasterizer
//!
//! Renders merged DOT files to PNG by shelling out to `dot`.

use crate::ports::Rasterizer;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Invokes `dot -Tpng <file> -o <out_dir>/<file>.png`.
#[derive(Debug)]
pub struct DotRasterizer {
    out_dir: PathBuf,
}

impl DotRasterizer {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }
}

impl Default for DotRasterizer {
    fn default() -> Self {
        Self::new("png")
    }
}

impl Rasterizer for DotRasterizer {
    fn render(&self, dot_file: &Path) -> Result<()> {
        fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("can't create render directory {}", self.out_dir.display()))?;

        let file_name = dot_file
            .file_name()
            .with_context(|| format!("no file name in {}", dot_file.display()))?;
        let png_path = self
            .out_dir
            .join(format!("{}.png", file_name.to_string_lossy()));

        let status = Command::new("dot")
            .arg("-Tpng")
            .arg(dot_file)
            .arg("-o")
            .arg(&png_path)
            .status()
            .context("can't run `dot`; is graphviz installed?")?;

        if !status.success() {
            bail!("dot failed with {status} for {}", dot_file.display());
        }

        Ok(())
    }
}
