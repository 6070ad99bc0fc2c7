//! s3b - interactive S3 bucket browser
//!
//! Browse a bucket's flat key namespace as a directory tree and move files
//! between it and the local filesystem.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use s3b::commands::{self, Cli, FAREWELL};
use s3b::exit_code::ExitCode;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with listings
    let filter = if cli.debug {
        EnvFilter::new("s3b=debug,s3b_core=debug,s3b_s3=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{FAREWELL}");
            std::process::exit(ExitCode::Interrupted.as_i32());
        }
    });

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
