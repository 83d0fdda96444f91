use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the data directory
pub const DATA_DIR_ENV: &str = "TRAVEL_DATA_DIR";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "TRAVEL_CONFIG_PATH";

const DEFAULT_CONFIG_FILE: &str = ".travel.config";

/// Settings read from the optional YAML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Folder holding trips.csv, bookings.csv, trip_legs.csv and users.csv
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Loads the config from the provided path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))
    }

    /// Loads the config if the file exists, otherwise returns defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Gets the path to the config file, if one can be determined
pub fn get_config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    // Default to ~/.travel.config
    dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_FILE))
}

/// Determines the data directory from the command line, the environment,
/// the config file, and finally the current directory
pub fn determine_data_dir(cli_option: Option<&Path>) -> Result<PathBuf> {
    let env_value = env::var(DATA_DIR_ENV).ok();
    let config_path = get_config_path();
    resolve_data_dir(cli_option, env_value.as_deref(), config_path.as_deref())
}

fn resolve_data_dir(
    cli_option: Option<&Path>,
    env_value: Option<&str>,
    config_path: Option<&Path>,
) -> Result<PathBuf> {
    // Priority 1: command line
    if let Some(dir) = cli_option {
        return Ok(dir.to_path_buf());
    }

    // Priority 2: environment
    if let Some(dir) = env_value.filter(|v| !v.trim().is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    // Priority 3: config file
    if let Some(path) = config_path {
        if let Some(dir) = Config::load_or_default(path)?.data_dir {
            return Ok(dir);
        }
    }

    Ok(PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_option_wins() {
        let dir = resolve_data_dir(Some(Path::new("/cli")), Some("/env"), None).unwrap();
        assert_eq!(dir, PathBuf::from("/cli"));
    }

    #[test]
    fn test_env_before_config() -> Result<()> {
        let temp = tempdir()?;
        let config_path = temp.path().join("travel.config");
        fs::write(&config_path, "data_dir: /from-config\n")?;

        let dir = resolve_data_dir(None, Some("/env"), Some(&config_path))?;
        assert_eq!(dir, PathBuf::from("/env"));

        let dir = resolve_data_dir(None, Some("  "), Some(&config_path))?;
        assert_eq!(dir, PathBuf::from("/from-config"));
        Ok(())
    }

    #[test]
    fn test_missing_config_falls_back_to_current_dir() -> Result<()> {
        let temp = tempdir()?;
        let dir = resolve_data_dir(None, None, Some(&temp.path().join("absent")))?;
        assert_eq!(dir, PathBuf::from("."));
        Ok(())
    }

    #[test]
    fn test_bad_config_is_reported() -> Result<()> {
        let temp = tempdir()?;
        let config_path = temp.path().join("travel.config");
        fs::write(&config_path, "data_dir: [unclosed\n")?;

        let err = resolve_data_dir(None, None, Some(&config_path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        Ok(())
    }
}
