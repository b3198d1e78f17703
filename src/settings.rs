use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_NAME: &str = "fintrack";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: String,
    pub export_path: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: "finance_tracker.db".to_string(),
            export_path: "transactions_by_month.xlsx".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Layers, lowest priority first: defaults, the TOML file (`fintrack.toml`
/// unless `config_path` is given, in which case it must exist), `FINTRACK_*`
/// environment variables, then `database_override`.
pub fn load(config_path: Option<&str>, database_override: Option<String>) -> Result<AppConfig> {
    let file = match config_path {
        Some(path) => config::File::with_name(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let mut settings: AppConfig = config::Config::builder()
        .add_source(file)
        .add_source(config::Environment::with_prefix("FINTRACK"))
        .build()?
        .try_deserialize()?;

    if let Some(database) = database_override {
        settings.database_path = database;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use std::io::Write;

    #[test]
    fn test_load_from_file_keeps_defaults_for_missing_keys() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "export_path = \"out/monthly.xlsx\"").unwrap();

        let settings = load(file.path().to_str(), None).unwrap();

        assert_eq!(settings.export_path, "out/monthly.xlsx");
        assert_eq!(settings.database_path, AppConfig::default().database_path);
    }

    #[test]
    fn test_database_override_wins() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "database_path = \"from_file.db\"").unwrap();

        let settings = load(file.path().to_str(), Some("from_cli.db".to_string())).unwrap();

        assert_eq!(settings.database_path, "from_cli.db");
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let result = load(Some("/nonexistent/fintrack-settings.toml"), None);
        assert!(matches!(result, Err(LedgerError::Config(_))));
    }
}
