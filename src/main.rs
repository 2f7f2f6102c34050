// Command-line entry point for the Tracelens merge tool.

use clap::error::ErrorKind;
use clap::Parser;
use std::path::Path;
use std::process;
use tracelens::application::{GraphMergeEngine, MergeMode};
use tracelens::infrastructure::DotRasterizer;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Dynamic dump produced at the end of an instrumented run
    dynamic_dump: String,

    /// Merge into every regular file in the working directory whose name
    /// starts with this prefix
    prefix: String,

    /// Prefix for merged output files; rewrites the static files in place
    /// when omitted
    output_prefix: Option<String>,

    /// Merge mode
    #[arg(short, long, value_enum, default_value_t = MergeMode::Edges)]
    mode: MergeMode,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            process::exit(code);
        }
    };

    let rasterizer = DotRasterizer::default();
    let engine = GraphMergeEngine::new(cli.mode, &rasterizer);

    match engine.run(
        Path::new(&cli.dynamic_dump),
        Path::new("."),
        &cli.prefix,
        cli.output_prefix.as_deref(),
    ) {
        Ok(merged) => println!(
            "Merged {merged} graph file(s) with prefix '{}' (mode: {})",
            cli.prefix, cli.mode
        ),
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(1);
        }
    }
}
