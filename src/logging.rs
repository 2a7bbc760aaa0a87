use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the stderr log subscriber.
///
/// `RUST_LOG` or `INTRO_SCORER_LOG` override the level chosen from `verbose`.
pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = if verbose {
        "intro_scorer=debug"
    } else {
        "intro_scorer=warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("INTRO_SCORER_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr())),
        )
        .try_init()?;

    Ok(())
}
