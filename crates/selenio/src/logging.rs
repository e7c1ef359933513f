//! Log setup for harness runs.

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber for a harness run.
///
/// Honors `RUST_LOG` overrides, falling back to `info` (or `debug` when
/// `verbose` is set). Safe to call more than once: a second fixture or test
/// binary entry point initializing again is a no-op.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Log to stderr so harness output never mixes with test stdout
    let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(stderr)
        .with_target(true)
        .with_level(true)
        .compact()
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reinitialization_is_a_no_op() {
        init(false);
        init(true);
    }
}
