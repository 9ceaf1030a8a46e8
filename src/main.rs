use std::env;
use std::fs;
use std::io;
use std::process::ExitCode;

use chrono::Utc;
use instr_eng::json::{RequestValidator, write_result};
use instr_eng::{Engine, Status};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: instr-eng <request.json>");
        return ExitCode::from(2);
    };

    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
            error!(path, "failed to read request: {e}");
            return ExitCode::from(2);
        }
    };

    let request = match RequestValidator::new().parse(&raw) {
        Ok(request) => request,
        Err(e) => {
            error!("invalid request: {e}");
            return ExitCode::from(2);
        }
    };

    let engine = Engine::new(Utc::now().date_naive());
    let result = match engine.process(&request.accounts, &request.instruction) {
        Ok(result) => result,
        Err(e) => {
            error!("processing failed: {e}");
            return ExitCode::from(2);
        }
    };

    let stdout = io::stdout();
    if let Err(e) = write_result(&mut stdout.lock(), &result) {
        error!("failed to write result: {e}");
        return ExitCode::from(2);
    }

    // 0 for successful and pending outcomes, 1 for business failures; 2 is
    // reserved for transport and internal faults above.
    match result.status {
        Status::Failed => ExitCode::from(1),
        Status::Successful | Status::Pending => ExitCode::SUCCESS,
    }
}
