//! dcsearch CLI binary.

use std::process;

use clap::Parser;
use dcsearch::cli::{DcSearchArgs, execute_command, init_logging};

fn main() {
    let args = DcSearchArgs::parse();
    init_logging(&args);

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
