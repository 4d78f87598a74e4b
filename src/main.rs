use clap::Parser;
use dircombine::cli::{Cli, Output};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.run() {
        Ok(code) => code,
        Err(err) => {
            Output::new(false, false).error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
