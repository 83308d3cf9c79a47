use std::process::ExitCode;
use sweep_runner::{cli, core::error::TrialError};

#[tokio::main]
async fn main() -> ExitCode {
    match cli::run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            // Operator interruption is reported by the runner itself; exit like a shell would on SIGINT.
            if matches!(e.downcast_ref::<TrialError>(), Some(TrialError::Interrupted { .. })) {
                return ExitCode::from(130);
            }
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
