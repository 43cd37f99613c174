//! Tracing initialization
//!
//! Logs go to stderr so that command output on stdout stays clean.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map a `-v` count onto a default level for the calling crate.
fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Initialize tracing for a dashboard binary
///
/// Sets up logging to stderr with:
/// - Environment-based filtering via RUST_LOG
/// - A default directive of `<crate_name>=info`, raised by `verbosity`
///
/// Set `LOG_FORMAT=json` for structured JSON output.
/// Default is human-readable text output.
///
/// # Arguments
///
/// * `crate_name` - The binary crate's module name (e.g., "skylily")
/// * `verbosity` - Number of `-v` flags given on the command line
pub fn init_tracing(crate_name: &str, verbosity: u8) -> anyhow::Result<()> {
    let directive = format!("{}={}", crate_name, level_for(verbosity));
    let mut filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    // Library crates log under their own targets
    for lib in ["pulsed_client", "feeds"] {
        if lib != crate_name {
            filter = filter.add_directive(format!("{}={}", lib, level_for(verbosity)).parse()?);
        }
    }

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}
