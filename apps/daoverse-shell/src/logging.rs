use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Filter precedence: `-v` flags, then `RUST_LOG`, then the configured level.
fn resolve_filter(config: &LoggingConfig, verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level)),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays
/// machine-readable.
pub fn init(config: &LoggingConfig, verbose: u8) {
    let filter = resolve_filter(config, verbose);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = installed {
        eprintln!("logging already initialized: {e}");
    }
}
