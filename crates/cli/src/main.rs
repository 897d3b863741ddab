use std::process::ExitCode;

fn main() -> ExitCode {
    presente_cli::run()
}
