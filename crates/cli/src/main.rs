use std::process::ExitCode;

fn main() -> ExitCode {
    tripweaver_cli::run()
}
