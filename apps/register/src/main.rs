//! # Kasir Register Entry Point
//!
//! The setup lives in lib.rs for testability.

use std::process::ExitCode;

fn main() -> ExitCode {
    match kasir_register::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Register stopped");
            eprintln!("kasir-register: {}", e);
            ExitCode::FAILURE
        }
    }
}
