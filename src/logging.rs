//! Logger setup for hosts that run the plug-in.
//!
//! The library only emits `log` records: the rounder reports the radius and
//! each phase at `debug`, the memory host traces individual procedure calls.
//! A host that wants to see them calls [`init_logging`] once at startup; the
//! bundled CLI does this before loading the image.

use std::sync::Once;

use log::LevelFilter;

/// Where the log filter comes from and how output is colored.
///
/// `env_filter` uses `env_logger` directives, so `"debug"` and
/// `"rounded_iconify=trace"` both work. Without it `RUST_LOG` is consulted.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Uses `filter` instead of `RUST_LOG`, e.g. the CLI's `--log` value.
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }
}

/// Picks the filter directives: explicit config wins over the environment.
///
/// `None` means no directives were given and the `info` level applies.
fn filter_directives(config: Option<String>, env: Option<String>) -> Option<String> {
    config.or(env).filter(|f| !f.trim().is_empty())
}

static INIT: Once = Once::new();

/// Installs `env_logger` as the global logger.
///
/// Only the first call does anything. If another logger is already installed
/// (a test harness, an embedding application) it is left alone.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        match filter_directives(config.env_filter, std::env::var("RUST_LOG").ok()) {
            Some(directives) => builder.parse_filters(&directives),
            None => builder.filter_level(LevelFilter::Info),
        };
        builder.write_style(config.write_style);

        if builder.try_init().is_ok() {
            log::debug!("logger installed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init_logging(LoggingConfig::with_filter("debug"));
        init_logging(LoggingConfig::default());
    }

    #[test]
    fn explicit_filter_beats_environment() {
        assert_eq!(
            filter_directives(Some("warn".into()), Some("trace".into())).as_deref(),
            Some("warn")
        );
        assert_eq!(
            filter_directives(None, Some("trace".into())).as_deref(),
            Some("trace")
        );
        assert_eq!(filter_directives(None, None), None);
        assert_eq!(filter_directives(Some("  ".into()), None), None);
    }

    #[test]
    fn with_filter_keeps_auto_style() {
        let config = LoggingConfig::with_filter("warn");
        assert_eq!(config.env_filter.as_deref(), Some("warn"));
        assert!(matches!(config.write_style, env_logger::WriteStyle::Auto));
    }
}
