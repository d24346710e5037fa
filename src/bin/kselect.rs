//! Elbow method and silhouette analysis on 300 synthetic points from 4 blobs.
//!
//! Shows the WCSS chart for k = 1..=10, then the silhouette chart for
//! k = 2..=10. Each chart stays up until Enter is pressed.
//!
//! Usage: `kselect`
//!
//! Set `LOG` (e.g. `LOG=info`) to see per-k values on stderr.

use anyhow::Context as _;
use kselect_rs::{Experiment, TerminalViewer};
use std::io;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::Registry;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var("LOG")
        .from_env_lossy();
    Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let experiment = Experiment::default();
    let mut viewer = TerminalViewer::stdio();

    experiment
        .run(&mut viewer)
        .context("failed to run the k selection demonstration")?;

    Ok(())
}
