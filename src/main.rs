//! git-connector-cgi binary entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    match git_connector::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("git-connector-cgi: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
