//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use ember_config::Config;
use ember_core::FieldVariant;

#[derive(Debug, Parser)]
#[command(name = "ember")]
#[command(version, about = "Drifting embers and constellations in your terminal", long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Seed for the particle field
    #[arg(long)]
    pub seed: Option<u64>,

    /// Presentation: constellation or embers
    #[arg(long, value_parser = parse_variant)]
    pub variant: Option<FieldVariant>,

    /// Particle count on wide terminals
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Keep the field still
    #[arg(long)]
    pub reduced_motion: bool,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Override config values with the flags that were given.
    pub fn apply(&self, config: &mut Config) {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(variant) = self.variant {
            config.field.variant = variant;
        }
        if let Some(count) = self.count {
            config.field.count = count;
        }
        if self.reduced_motion {
            config.reduced_motion = true;
        }
    }
}

fn parse_variant(s: &str) -> Result<FieldVariant, String> {
    FieldVariant::from_name(s).ok_or_else(|| format!("unknown variant `{s}`"))
}
