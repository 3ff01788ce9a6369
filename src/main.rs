use clap::Parser;
use finsheet::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
