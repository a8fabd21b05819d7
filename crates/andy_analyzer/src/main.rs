mod args;

use crate::args::{Args, Mode};
use andy_analyzer::{run_request, serve};
use clap::Parser;
use std::io;
use tracing::debug;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let log_level_filter = args.logging().log_level_filter();

    let registry = Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_filter(log_level_filter),
        )
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(registry)?;

    match args.mode() {
        Mode::OneShot { input, temp } => run_request(&input, &temp, io::stdout().lock())?,
        Mode::Server => {
            let answered = serve(io::stdin().lock(), io::stdout().lock())?;
            debug!("stdin closed after {answered} requests");
        }
    }
    Ok(())
}
