//! CLI entry point for simple tiled wave function collapse

use clap::Parser;
use simpletiled::io::cli::{Cli, FileProcessor};

fn main() -> simpletiled::Result<()> {
    let cli = Cli::parse();
    let mut processor = FileProcessor::new(cli);
    processor.run()
}
