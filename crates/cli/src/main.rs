use std::process::ExitCode;

fn main() -> ExitCode {
    homzhub_cli::run()
}
