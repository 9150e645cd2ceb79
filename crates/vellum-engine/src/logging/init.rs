use std::sync::Once;

/// Filter applied when neither the config nor `RUST_LOG` names one.
///
/// The physics solver is chatty at `info`, so it is held at `warn`.
pub const DEFAULT_FILTER: &str = "info,rapier2d=warn";

/// Logger setup for a game binary.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter string, e.g. `"vellum_engine::physics=trace"`.
    /// Takes precedence over `RUST_LOG`.
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Millisecond timestamps on every line.
    pub timestamps: bool,
    /// Prefix lines with the emitting module path.
    pub module_path: bool,
}

impl LoggingConfig {
    /// Debug-level output for the engine crate only.
    pub fn verbose() -> Self {
        Self {
            env_filter: Some(format!("{DEFAULT_FILTER},vellum_engine=debug")),
            ..Self::default()
        }
    }

    fn resolve_filter(&self) -> String {
        self.env_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| DEFAULT_FILTER.to_owned())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            timestamps: true,
            module_path: true,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global `env_logger` once; later calls do nothing.
///
/// A logger installed by the host beforehand is left in place.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.resolve_filter();

        let mut builder = env_logger::Builder::new();
        builder
            .parse_filters(&filter)
            .write_style(config.write_style)
            .format_module_path(config.module_path);

        if config.timestamps {
            builder.format_timestamp_millis();
        } else {
            builder.format_timestamp(None);
        }

        match builder.try_init() {
            Ok(()) => log::debug!("logging initialized with filter `{filter}`"),
            Err(_) => log::debug!("logger already installed, keeping it"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let config = LoggingConfig { env_filter: Some("warn".into()), ..LoggingConfig::default() };
        assert_eq!(config.resolve_filter(), "warn");
    }

    #[test]
    fn verbose_raises_engine_level_only() {
        let filter = LoggingConfig::verbose().resolve_filter();
        assert!(filter.starts_with(DEFAULT_FILTER));
        assert!(filter.ends_with("vellum_engine=debug"));
    }
}
