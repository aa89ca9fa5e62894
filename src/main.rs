//! apkforge - containerized Android APK build pipeline.

use std::process;

use apkforge::cli;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            if let Some(hint) = e.remediation() {
                eprintln!("Hint: {hint}");
            }
            1
        }
    };

    process::exit(exit_code);
}
