//! Configuration presets for common scenarios

use super::RouterConfig;

impl RouterConfig {
    /// Create configuration from environment variables
    ///
    /// Reads `NEBULA_LOG_DIR`, `NEBULA_LOG_CONSOLE`, `NEBULA_LOG_COLORS` and
    /// `NEBULA_LOG_MAX_SIZE` (bytes). Unset or unparsable values keep defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("NEBULA_LOG_DIR") {
            config.log_dir = dir.into();
        }
        if let Ok(v) = std::env::var("NEBULA_LOG_CONSOLE") {
            config.console = flag(&v);
        }
        if let Ok(v) = std::env::var("NEBULA_LOG_COLORS") {
            config.console_colors = flag(&v);
        }
        if let Some(size) = std::env::var("NEBULA_LOG_MAX_SIZE")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            config.rotation.max_size_bytes = size;
        }

        config
    }

    /// Development configuration (console mirror with colors)
    #[must_use]
    pub fn development() -> Self {
        Self {
            console: true,
            console_colors: true,
            ..Self::default()
        }
    }

    /// Production configuration (files only)
    #[must_use]
    pub fn production() -> Self {
        Self {
            console: false,
            console_colors: false,
            ..Self::default()
        }
    }
}

fn flag(value: &str) -> bool {
    value != "0" && !value.eq_ignore_ascii_case("false")
}
