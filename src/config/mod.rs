mod settings;

pub use settings::{Config, DisplaySettings};

use crate::error::{RecognitionError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG config dir, else ~/.revrec/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "revrec") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = std::env::var_os("HOME").map(PathBuf::from).ok_or_else(|| {
        RecognitionError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".revrec"))
}

pub fn config_file(config_dir: &Path) -> PathBuf {
    config_dir.join("config.toml")
}

/// Load config.toml (defaults if missing)
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_file(config_dir);
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| RecognitionError::ConfigParse { path, source: e })
}

/// Create the config directory and write the template config.toml
pub fn init_config(config_dir: &Path) -> Result<PathBuf> {
    if config_dir.exists() {
        return Err(RecognitionError::AlreadyInitialized(config_dir.to_path_buf()));
    }
    fs::create_dir_all(config_dir)?;
    let path = config_file(config_dir);
    fs::write(&path, CONFIG_TEMPLATE)?;
    Ok(path)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[recognition]
# Rounding of per-day and pro-rata slices: "half_up" or "half_even"
rounding = "half_up"
# Invoices with unparseable dates: "skip" (log and continue) or "reject" (fail)
invalid_dates = "skip"
# Invoices with a negative total: "pass_through", "skip" or "reject"
negative_amounts = "pass_through"

[display]
currency_symbol = "$"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::{InvalidDatePolicy, RoundingMode};

    #[test]
    fn template_parses_to_defaults() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"[recognition]
invalid_dates = "reject"
"#,
        )
        .unwrap();
        assert_eq!(config.recognition.invalid_dates, InvalidDatePolicy::Reject);
        assert_eq!(config.recognition.rounding, RoundingMode::HalfUp);
        assert_eq!(config.display.currency_symbol, "$");
    }
}
