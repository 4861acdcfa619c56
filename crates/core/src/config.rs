//! Persisted configuration: the sheet URL and the column map.
//!
//! The configuration file is a small JSON record:
//!
//! ```json
//! {
//!   "sheet_url": "https://docs.google.com/spreadsheets/d/<id>/edit",
//!   "sheet_name": "Sheet1",
//!   "column_map": { "BK_Number": "No", "BK_name": "Title", "BK_row": "Rack" }
//! }
//! ```

use crate::error::{RackError, RackResult};
use crate::field::LogicalField;
use racksearch_sheet::Table;
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Sheet tab used when none is configured.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}

/// Mapping from logical field to the spreadsheet header that holds it.
///
/// Always carries exactly the three logical keys. When deserialized, keys
/// missing from the input become `""` and unknown keys are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    #[serde(rename = "BK_Number", default)]
    pub number: String,
    #[serde(rename = "BK_name", default)]
    pub name: String,
    #[serde(rename = "BK_row", default)]
    pub location: String,
}

impl Default for ColumnMap {
    /// Placeholder map: every logical key mapped to its own name.
    fn default() -> Self {
        Self {
            number: LogicalField::Number.key().to_string(),
            name: LogicalField::Name.key().to_string(),
            location: LogicalField::Location.key().to_string(),
        }
    }
}

impl ColumnMap {
    /// Build a map from explicit header names.
    pub fn new(
        number: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            location: location.into(),
        }
    }

    /// The raw mapped header for a field, possibly empty.
    #[must_use]
    pub fn get(&self, field: LogicalField) -> &str {
        match field {
            LogicalField::Number => &self.number,
            LogicalField::Name => &self.name,
            LogicalField::Location => &self.location,
        }
    }

    /// The mapped header for a field, or `None` when the field is unmapped.
    #[must_use]
    pub fn header(&self, field: LogicalField) -> Option<&str> {
        Some(self.get(field)).filter(|h| !h.is_empty())
    }

    /// Map a field to a header.
    pub fn set(&mut self, field: LogicalField, header: impl Into<String>) {
        let slot = match field {
            LogicalField::Number => &mut self.number,
            LogicalField::Name => &mut self.name,
            LogicalField::Location => &mut self.location,
        };
        *slot = header.into();
    }

    /// Iterate over `(field, header)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (LogicalField, &str)> {
        LogicalField::ALL.into_iter().map(|f| (f, self.get(f)))
    }

    /// Headers chosen for more than one field, in first-seen order.
    #[must_use]
    pub fn duplicate_headers(&self) -> Vec<String> {
        let mut seen: Vec<&str> = Vec::new();
        let mut dupes: Vec<String> = Vec::new();
        for (_, header) in self.iter() {
            if header.is_empty() {
                continue;
            }
            if seen.contains(&header) {
                if !dupes.iter().any(|d| d == header) {
                    dupes.push(header.to_string());
                }
            } else {
                seen.push(header);
            }
        }
        dupes
    }

    /// Fields that cannot be read from `table`: unmapped, or mapped to a
    /// header the table does not have.
    #[must_use]
    pub fn unresolved(&self, table: &Table) -> Vec<LogicalField> {
        self.iter()
            .filter(|(_, header)| header.is_empty() || !table.has_column(header))
            .map(|(field, _)| field)
            .collect()
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Published spreadsheet URL (Google Sheets link or direct CSV link).
    #[serde(default)]
    pub sheet_url: String,
    /// Tab of the spreadsheet to export.
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    /// Logical field to header mapping.
    #[serde(default, alias = "mapping")]
    pub column_map: ColumnMap,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_url: String::new(),
            sheet_name: default_sheet_name(),
            column_map: ColumnMap::default(),
        }
    }
}

impl Config {
    /// Create a configuration for a sheet URL with the placeholder map.
    pub fn with_url(sheet_url: impl Into<String>) -> Self {
        Self {
            sheet_url: sheet_url.into(),
            ..Self::default()
        }
    }

    /// Whether a sheet URL has been set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.sheet_url.trim().is_empty()
    }

    /// Check that the configuration can be saved.
    pub fn validate(&self) -> RackResult<()> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(RackError::EmptySheetUrl)
        }
    }
}

/// Loads and saves the configuration file.
///
/// There is no locking: concurrent saves race and the last one wins. Each
/// save replaces the file atomically, so readers never see a partial write.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Configuration file name used when no path is given.
    pub const DEFAULT_FILE: &'static str = "config.json";

    /// Create a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted configuration.
    ///
    /// A missing or malformed file yields [`Config::default`]; this never
    /// fails.
    #[must_use]
    pub fn load(&self) -> Config {
        match self.read() {
            Ok(Some(config)) => config,
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "no configuration file, using defaults");
                Config::default()
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "ignoring unreadable configuration: {e}"
                );
                Config::default()
            }
        }
    }

    fn read(&self) -> RackResult<Option<Config>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Validate and persist `config`, replacing any previous file.
    ///
    /// # Errors
    ///
    /// Returns `RackError::EmptySheetUrl` if the URL is empty, or an I/O or
    /// JSON error if the file cannot be written.
    pub fn save(&self, config: &Config) -> RackResult<()> {
        config.validate()?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, config)?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path).map_err(|e| RackError::Io(e.error))?;

        tracing::info!(path = %self.path.display(), "saved configuration");
        Ok(())
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn configured() -> Config {
        Config {
            sheet_url: "https://docs.google.com/spreadsheets/d/abc123/edit".to_string(),
            sheet_name: "Stock".to_string(),
            column_map: ColumnMap::new("No", "Title", "Rack"),
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sheet_url, "");
        assert_eq!(config.sheet_name, "Sheet1");
        assert_eq!(config.column_map.number, "BK_Number");
        assert_eq!(config.column_map.name, "BK_name");
        assert_eq!(config.column_map.location, "BK_row");
        assert!(!config.is_configured());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(ConfigStore::new(&path).load(), Config::default());

        std::fs::write(&path, r#"{"sheet_url": 42}"#).unwrap();
        assert_eq!(ConfigStore::new(&path).load(), Config::default());
    }

    #[test]
    fn test_load_fills_missing_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"sheet_url": "https://x.test/a.csv", "column_map": {"BK_name": "Title", "BK_rate": "Price"}}"#,
        )
        .unwrap();

        let config = ConfigStore::new(&path).load();
        assert_eq!(config.sheet_url, "https://x.test/a.csv");
        assert_eq!(config.sheet_name, "Sheet1");
        assert_eq!(config.column_map, ColumnMap::new("", "Title", ""));
    }

    #[test]
    fn test_load_accepts_mapping_alias() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"sheet_url": "u", "sheet_name": "S", "mapping": {"BK_Number": "No", "BK_name": "Title", "BK_row": "Rack"}}"#,
        )
        .unwrap();

        let config = ConfigStore::new(&path).load();
        assert_eq!(config.column_map, ColumnMap::new("No", "Title", "Rack"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("nested").join("config.json"));
        let config = configured();

        store.save(&config).unwrap();
        assert_eq!(store.load(), config);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));

        store.save(&configured()).unwrap();
        let mut second = configured();
        second.column_map.set(LogicalField::Name, "Book");
        store.save(&second).unwrap();

        assert_eq!(store.load().column_map.name, "Book");
    }

    #[test]
    fn test_save_rejects_empty_url() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = ConfigStore::new(&path);

        let mut config = configured();
        config.sheet_url = "   ".to_string();
        assert!(matches!(store.save(&config), Err(RackError::EmptySheetUrl)));
        assert!(!path.exists());
    }

    #[test]
    fn test_saved_file_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        ConfigStore::new(&path).save(&configured()).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["column_map"]["BK_Number"], "No");
        assert_eq!(json["column_map"]["BK_row"], "Rack");
        assert_eq!(json["column_map"].as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_header_empty_is_none() {
        let map = ColumnMap::new("No", "", "Rack");
        assert_eq!(map.header(LogicalField::Number), Some("No"));
        assert_eq!(map.header(LogicalField::Name), None);
    }

    #[test]
    fn test_duplicate_headers() {
        assert!(ColumnMap::new("A", "B", "C").duplicate_headers().is_empty());
        assert!(ColumnMap::new("", "", "C").duplicate_headers().is_empty());
        assert_eq!(ColumnMap::new("A", "A", "A").duplicate_headers(), vec!["A"]);
    }

    #[test]
    fn test_unresolved() {
        let table = Table::from_data(vec![vec!["No", "Title"]]).unwrap();
        let map = ColumnMap::new("No", "Name", "");
        assert_eq!(
            map.unresolved(&table),
            vec![LogicalField::Name, LogicalField::Location]
        );
    }
}
