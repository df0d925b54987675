use std::process::ExitCode;

fn main() -> ExitCode {
    intake_core::init();
    match intake_core::cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}
