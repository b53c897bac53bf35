use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the stderr subscriber. `RUST_LOG` wins over the `--verbose` default.
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "info,scholar=debug,scholar_cli=debug"
    } else {
        "warn"
    };
    let env_filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()),
    );

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
    {
        eprintln!("Tracing init warning: {}", e);
    }
}
