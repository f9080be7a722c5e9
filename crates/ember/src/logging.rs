//! File logging.
//!
//! The terminal is taken over by the UI, so logs only go to a file.

use std::fs::OpenOptions;
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Send logs to `path`, filtered by `RUST_LOG` (default `info`).
pub fn init(path: &Path) -> color_eyre::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}
