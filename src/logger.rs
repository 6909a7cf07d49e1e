use tracing_subscriber::{EnvFilter, FmtSubscriber};

const FALLBACK_DIRECTIVE: &str = "info";

/// Installs the global subscriber. Logs go to stderr so stdout stays free
/// for the report.
pub fn init_logging(verbose: bool, no_color: bool) {
    let directive = filter_directive(
        std::env::var("SITEPERF_LOG").ok(),
        std::env::var("RUST_LOG").ok(),
        verbose,
    );

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(build_filter(&directive))
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

/// `SITEPERF_LOG` wins over `RUST_LOG`; with neither set, `--verbose`
/// picks between debug and info.
fn filter_directive(siteperf_log: Option<String>, rust_log: Option<String>, verbose: bool) -> String {
    siteperf_log.or(rust_log).unwrap_or_else(|| {
        if verbose {
            "debug".to_owned()
        } else {
            FALLBACK_DIRECTIVE.to_owned()
        }
    })
}

fn build_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE))
}
