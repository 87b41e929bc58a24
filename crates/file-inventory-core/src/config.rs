use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_NAME: &str = "file_inventory.db";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory scanned when no root is given on the command line.
    pub root_path: String,
    /// File name of the inventory database inside the scan root.
    pub db_name: String,
    /// Glob patterns matched against full paths; matching entries are neither
    /// recorded nor descended.
    pub ignore_patterns: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root_path: ".".to_string(),
            db_name: DEFAULT_DB_NAME.to_string(),
            ignore_patterns: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Location of the inventory database for a scan of `root`.
    pub fn db_path_for(&self, root: &Path) -> PathBuf {
        root.join(&self.db_name)
    }
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(
            Environment::with_prefix("FILE_INVENTORY")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("ignore_patterns"),
        )
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.root_path, ".");
        assert_eq!(config.db_name, "file_inventory.db");
        assert!(config.ignore_patterns.is_empty());
    }

    #[test]
    fn test_db_path_for_root() {
        let config = AppConfig {
            db_name: "inv.db".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(
            config.db_path_for(Path::new("/data/photos")),
            PathBuf::from("/data/photos/inv.db")
        );
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: AppConfig = Config::builder()
            .set_override("root_path", "/srv/share")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.root_path, "/srv/share");
        assert_eq!(config.db_name, DEFAULT_DB_NAME);
        assert!(config.ignore_patterns.is_empty());
    }
}
