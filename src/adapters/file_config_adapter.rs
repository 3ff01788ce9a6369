//! INI file configuration adapter.
//!
//! Section and key names are case-insensitive. A key with an empty value
//! reads as absent, so `company_name =` falls back to the default.

use crate::domain::error::FinsheetError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FinsheetError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| FinsheetError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get_string(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = "[market]\n\
                       company_name = Acme Industries Ltd\n\
                       total_market_size = 250000\n\
                       \n\
                       [validation]\n\
                       required_metrics = revenue, expenses, netProfit\n";
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("market", "company_name"),
            Some("Acme Industries Ltd".to_string())
        );
        assert_eq!(
            adapter.get_string("validation", "required_metrics"),
            Some("revenue, expenses, netProfit".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[market]\ninnovation = 0.5\n").unwrap();
        assert_eq!(adapter.get_string("market", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn empty_value_reads_as_missing() {
        let adapter = FileConfigAdapter::from_string("[market]\ncompany_name =\n").unwrap();
        assert_eq!(adapter.get_string("market", "company_name"), None);
    }

    #[test]
    fn values_are_trimmed() {
        let adapter =
            FileConfigAdapter::from_string("[market]\ncompany_name =   Acme Ltd  \n").unwrap();
        assert_eq!(adapter.get_string("market", "company_name"), Some("Acme Ltd".to_string()));
    }

    #[test]
    fn keys_are_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[Market]\nCompany_Name = Acme\n").unwrap();
        assert_eq!(adapter.get_string("market", "company_name"), Some("Acme".to_string()));
    }

    #[test]
    fn get_int_returns_value_or_default() {
        let adapter =
            FileConfigAdapter::from_string("[intel]\ntimeout_ms = 750\nbad = abc\n").unwrap();
        assert_eq!(adapter.get_int("intel", "timeout_ms", 0), 750);
        assert_eq!(adapter.get_int("intel", "missing", 42), 42);
        assert_eq!(adapter.get_int("intel", "bad", 42), 42);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[heuristics]\nebitda_revenue_share = 0.22\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("heuristics", "ebitda_revenue_share"),
            Some("0.22".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/finsheet.ini");
        assert!(matches!(result, Err(FinsheetError::ConfigParse { .. })));
    }
}
