//! Settings loading
//!
//! Layers, lowest first: built-in defaults, the settings file, then
//! `SWAPFORM__SECTION__KEY` environment variables.

use config::{Config, Environment, File, FileFormat};
use std::path::Path;
use tracing::info;

use swapform_core::AppConfig;

const DEFAULT_SETTINGS_FILE: &str = "swapform";

fn environment() -> Environment {
    Environment::with_prefix("SWAPFORM")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Load settings from an explicit file, or `./swapform.toml` if present
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let file = match path {
        Some(p) => File::from(p).required(true),
        None => File::with_name(DEFAULT_SETTINGS_FILE).required(false),
    };

    let settings: AppConfig = Config::builder()
        .add_source(file)
        .add_source(environment())
        .build()?
        .try_deserialize()?;

    settings.validate()?;
    info!(
        "Loaded settings: prices from {}, poll every {}ms",
        settings.feed.prices_url, settings.feed.poll_interval_ms
    );
    Ok(settings)
}

/// Parse settings from TOML text, defaults filling the gaps
pub fn parse_settings(toml: &str) -> anyhow::Result<AppConfig> {
    let settings: AppConfig = Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?
        .try_deserialize()?;

    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings, AppConfig::default());
    }

    #[test]
    fn test_overrides() {
        let settings = parse_settings(
            r#"
            [feed]
            poll_interval_ms = 30000
            stale_after_ms = 60000
            icon_base_path = "/static/tokens"

            [form]
            swap_delay_ms = 500
            "#,
        )
        .unwrap();

        assert_eq!(settings.feed.poll_interval_ms, 30_000);
        assert_eq!(settings.feed.icon_base_path, "/static/tokens");
        assert_eq!(settings.form.swap_delay_ms, 500);
        assert_eq!(settings.form.refetch_debounce_ms, 250);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(parse_settings("[feed]\npoll_interval_ms = 0\n").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        assert!(load_settings(Some(Path::new("/nonexistent/swapform.toml"))).is_err());
    }
}
