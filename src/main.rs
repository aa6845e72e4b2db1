//! ExPrac release tool - packaging and release automation.
//!
//! This binary builds the portable ExPrac artifacts (Linux AppImage, Windows
//! executable via a container cross-build) and drives the version-bump and
//! publish flow that used to live in shell scripts.

use exprac_release::cli;
use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
