//! lumptex - Command-line tool for decoding legacy patch, flat and composite textures

use std::process::ExitCode;

use lumptex::cli;

fn main() -> ExitCode {
    cli::run()
}
