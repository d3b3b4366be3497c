use clap::Parser;
use ndexcollapse_cli::{config_hint, run, CliArgs, RunError, FAILURE_EXIT_CODE};
use ndexcollapse_core::error::CollapseToolError;
use ndexcollapse_core::init_tracing;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(err) = init_tracing(args.verbose, args.logconf.as_deref()) {
        eprintln!("\n{}: {}", err.error_code(), err);
        return ExitCode::from(FAILURE_EXIT_CODE);
    }

    match run(&args).await {
        Ok(report) => {
            info!(
                network_id = %args.uuid,
                edges_before = report.summary.edges_before,
                edges_after = report.summary.edges_after,
                uploaded_url = %report.uploaded_url,
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(code = %err.error_code(), "{}", err);
            eprintln!("\n{}: {}", err.error_code(), err);
            if matches!(err, RunError::Config(_)) {
                eprintln!("expected credentials in {}", config_hint(&args));
            }
            ExitCode::from(FAILURE_EXIT_CODE)
        }
    }
}
