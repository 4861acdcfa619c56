//! Logical search fields.
//!
//! The three fixed dimensions a book can be searched by, independent of how
//! the backing spreadsheet names its columns.

use crate::error::RackError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three logical book fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalField {
    /// Book number (`BK_Number`).
    #[serde(rename = "BK_Number")]
    Number,
    /// Book name (`BK_name`).
    #[serde(rename = "BK_name")]
    Name,
    /// Rack / shelf location (`BK_row`).
    #[serde(rename = "BK_row")]
    Location,
}

impl LogicalField {
    /// All logical fields, in display order.
    pub const ALL: [LogicalField; 3] = [Self::Number, Self::Name, Self::Location];

    /// Key used in the configuration file and in result records.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Number => "BK_Number",
            Self::Name => "BK_name",
            Self::Location => "BK_row",
        }
    }

    /// Human readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Number => "Book Number",
            Self::Name => "Book Name",
            Self::Location => "Rack Location",
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for LogicalField {
    type Err = RackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bk_number" | "number" | "num" | "no" => Ok(Self::Number),
            "bk_name" | "name" | "title" => Ok(Self::Name),
            "bk_row" | "location" | "row" | "rack" => Ok(Self::Location),
            _ => Err(RackError::UnknownField(s.to_string())),
        }
    }
}

/// What a search runs against: one logical field, or any of the three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    Field(LogicalField),
    #[default]
    Any,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => write!(f, "{field}"),
            Self::Any => f.write_str("all"),
        }
    }
}

impl FromStr for SearchMode {
    type Err = RackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" | "any" => Ok(Self::Any),
            other => other
                .parse()
                .map(Self::Field)
                .map_err(|_| RackError::UnknownField(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!(LogicalField::Number.key(), "BK_Number");
        assert_eq!(LogicalField::Name.key(), "BK_name");
        assert_eq!(LogicalField::Location.key(), "BK_row");
    }

    #[test]
    fn test_parse_keys_and_aliases() {
        assert_eq!("BK_Number".parse::<LogicalField>().unwrap(), LogicalField::Number);
        assert_eq!("bk_name".parse::<LogicalField>().unwrap(), LogicalField::Name);
        assert_eq!("Location".parse::<LogicalField>().unwrap(), LogicalField::Location);
        assert_eq!("rack".parse::<LogicalField>().unwrap(), LogicalField::Location);
        assert!(matches!(
            "price".parse::<LogicalField>(),
            Err(RackError::UnknownField(s)) if s == "price"
        ));
    }

    #[test]
    fn test_display_roundtrips() {
        for field in LogicalField::ALL {
            assert_eq!(field.to_string().parse::<LogicalField>().unwrap(), field);
        }
    }

    #[test]
    fn test_search_mode() {
        assert_eq!("all".parse::<SearchMode>().unwrap(), SearchMode::Any);
        assert_eq!("".parse::<SearchMode>().unwrap(), SearchMode::Any);
        assert_eq!(
            "name".parse::<SearchMode>().unwrap(),
            SearchMode::Field(LogicalField::Name)
        );
        assert!("isbn".parse::<SearchMode>().is_err());
    }

    #[test]
    fn test_serde_uses_keys() {
        let json = serde_json::to_string(&LogicalField::Location).unwrap();
        assert_eq!(json, "\"BK_row\"");
    }
}
