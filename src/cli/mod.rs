//! Command line interface.

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command};
pub use output::OutputManager;

use clap::Parser;

use crate::error::Result;

/// Main CLI entry point; returns the process exit code.
pub async fn run() -> Result<i32> {
    let args = Args::parse();
    let out = OutputManager::new();

    match args.command {
        Command::Setup => commands::setup::run(&args.project, &out).await,
        Command::BuildArtifact => commands::build::run(&args.project, &out).await,
        Command::FixArtifact { artifact } => {
            commands::fix::run(&args.project, artifact, &out).await
        }
        Command::BuildBundle => commands::bundle::run(&args.project, &out).await,
        Command::Clean { remove_image } => {
            commands::clean::run(&args.project, remove_image, &out).await
        }
    }
}
