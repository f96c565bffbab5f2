//! Command line interface for dcsearch.

pub mod args;
pub mod commands;
pub mod output;

pub use args::*;
pub use commands::*;
pub use output::*;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install a stderr log subscriber. `RUST_LOG` wins over the verbosity flags.
pub fn init_logging(args: &DcSearchArgs) {
    let default_filter = match args.verbosity() {
        0 => "error",
        1 => "warn",
        2 => "dcsearch=info",
        _ => "dcsearch=debug",
    };

    // Fails only when a global subscriber is already installed; that one stays.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_init_logging_twice() {
        let args = DcSearchArgs::try_parse_from(["dcsearch", "-vv", "show-tree", "cat"]).unwrap();
        init_logging(&args);
        // The second call keeps the first subscriber instead of panicking.
        init_logging(&args);
        tracing::info!("logging initialized");
    }
}
