//! CLI argument definitions using clap derive macros.
//!
//! Run configuration comes from environment variables; the command line
//! only controls log verbosity.

use clap::Parser;

/// Stage a dataset's curation export files for a processing pipeline.
///
/// Reads INTEGRATION_ID, INPUT_DIR, OUTPUT_DIR, SESSION_TOKEN,
/// PENNSIEVE_API_HOST and PENNSIEVE_API_HOST2 from the environment, plus the
/// optional ENVIRONMENT (dev|prod) and METADATA_EXPORT (true|false).
#[derive(Parser, Debug)]
#[command(name = "ttl-sync")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Log level used when `RUST_LOG` is not set.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}
