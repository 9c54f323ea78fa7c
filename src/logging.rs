use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

const LOG_ENV: &str = "QUILLBAR_LOG";

/// Install the global subscriber. `QUILLBAR_LOG` (an `EnvFilter` directive)
/// wins over the configured level. The hook and windowing crates are noisy
/// at debug, so they are capped at warn unless named explicitly.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn default_directives(level: &str) -> String {
    let level = match level.trim().to_ascii_lowercase().as_str() {
        l @ ("error" | "warn" | "info" | "debug" | "trace" | "off") => l.to_string(),
        _ => "info".to_string(),
    };
    format!("{},wgpu=warn,naga=warn,iced_wgpu=warn,winit=warn,cosmic_text=warn", level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert!(default_directives("DEBUG").starts_with("debug,"));
        assert!(default_directives("verbose").starts_with("info,"));
        assert!(default_directives("warn").contains("wgpu=warn"));
    }
}
