use std::process::ExitCode;

fn main() -> ExitCode {
    gitutil::cli::run()
}
