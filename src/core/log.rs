use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const APP_TARGET: &str = "budgetboard";

/// Per-target levels. `--verbose` opens our own spans and events at debug
/// and lets reqwest's connection warnings through.
fn target_filter(verbose: bool) -> Targets {
    if verbose {
        Targets::new()
            .with_target(APP_TARGET, LevelFilter::DEBUG)
            .with_target("reqwest", LevelFilter::WARN)
    } else {
        Targets::new().with_target(APP_TARGET, LevelFilter::OFF)
    }
}

/// Installs the global subscriber on stderr so tables on stdout stay clean.
/// `RUST_LOG`, when set, narrows what the target filter lets through.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(target_filter(verbose))
        .with(env_filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_quiet_by_default() {
        let filter = target_filter(false);
        assert!(!filter.would_enable("budgetboard::core::refresh", &Level::ERROR));
        assert!(!filter.would_enable("reqwest::connect", &Level::WARN));
    }

    #[test]
    fn test_verbose_enables_debug_for_app_only() {
        let filter = target_filter(true);
        assert!(filter.would_enable("budgetboard::providers::util", &Level::DEBUG));
        assert!(filter.would_enable("reqwest::connect", &Level::WARN));
        assert!(!filter.would_enable("reqwest::connect", &Level::DEBUG));
        assert!(!filter.would_enable("hyper", &Level::ERROR));
    }
}
