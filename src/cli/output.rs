//! User-facing terminal output.
//!
//! Progress and result lines go to stdout, warnings to stderr. Diagnostic
//! detail belongs to `log::debug!`, not here.

use crate::pipeline::Stage;

/// Writes user-facing progress output for command handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputManager;

impl OutputManager {
    /// Creates an output manager.
    pub fn new() -> Self {
        Self
    }

    /// Progress line for an operation in flight.
    pub fn progress(&self, message: &str) {
        println!("→ {message}");
    }

    /// Success line for a completed operation.
    pub fn success(&self, message: &str) {
        println!("✓ {message}");
    }

    /// Warning line; never fatal.
    pub fn warn(&self, message: &str) {
        eprintln!("⚠ {message}");
    }

    /// Indented detail under the previous line.
    pub fn indent(&self, message: &str) {
        println!("  {message}");
    }

    /// Marks a pipeline stage transition.
    pub fn stage(&self, stage: Stage) {
        println!("[{stage}]");
    }
}
