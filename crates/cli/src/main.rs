use std::process::ExitCode;

use clap::Parser;

use backoffice_cli::{Cli, Outcome};
use backoffice_infra::ReconcileConfig;

fn main() -> ExitCode {
    // clap exits with status 2 on usage errors.
    let cli = Cli::parse();

    let config = ReconcileConfig::from_env();
    backoffice_observability::init(config.log_format);
    config.log_warnings();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match backoffice_cli::execute(&cli, &config, &mut out) {
        Ok(Outcome::Clean) => ExitCode::SUCCESS,
        Ok(Outcome::Discrepancy) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
