//! Product rewriter CLI entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use product_rewriter::telemetry::init_tracing;

mod cli;

use cli::Cli;

fn main() -> ExitCode {
    init_tracing();
    let args = Cli::parse();

    match cli::rewrite_file::run(&args) {
        Ok(_report) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}
