//! Resolving the configured sheet URL to a CSV download URL.

use crate::config::Config;
use crate::error::{RackError, RackResult};
use regex::Regex;
use url::Url;

const GOOGLE_DOCS_HOST: &str = "docs.google.com";

fn sheet_id_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/d/([A-Za-z0-9_-]+)").expect("valid regex"))
}

/// Extract the spreadsheet id from a Google Sheets URL.
///
/// ```
/// use racksearch_core::extract_sheet_id;
///
/// let url = "https://docs.google.com/spreadsheets/d/1AbC-d_9/edit#gid=0";
/// assert_eq!(extract_sheet_id(url), Some("1AbC-d_9"));
/// assert_eq!(extract_sheet_id("https://example.com/books.csv"), None);
/// ```
#[must_use]
pub fn extract_sheet_id(url: &str) -> Option<&str> {
    sheet_id_regex()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Build the URL to GET the sheet as CSV.
///
/// Google Sheets edit/share links are rewritten to the CSV export endpoint
/// for the configured tab. Links published to the web (`/d/e/...`) and any
/// other http(s) URL are used as-is.
///
/// # Errors
///
/// `RackError::NotConfigured` if no URL is set, and
/// `RackError::InvalidSheetUrl` if the URL does not parse or is not http(s).
pub fn export_url(config: &Config) -> RackResult<String> {
    let raw = config.sheet_url.trim();
    if raw.is_empty() {
        return Err(RackError::NotConfigured);
    }

    let url = Url::parse(raw).map_err(|e| RackError::InvalidSheetUrl(format!("{raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(RackError::InvalidSheetUrl(format!(
            "{raw}: unsupported scheme '{}'",
            url.scheme()
        )));
    }

    let is_google = url.host_str() == Some(GOOGLE_DOCS_HOST);
    let is_published = url.path().contains("/d/e/");
    if !is_google || is_published {
        return Ok(url.into());
    }

    let id = extract_sheet_id(url.path())
        .ok_or_else(|| RackError::InvalidSheetUrl(format!("{raw}: no spreadsheet id")))?;
    let base = format!("https://{GOOGLE_DOCS_HOST}/spreadsheets/d/{id}/gviz/tq");
    let export = Url::parse_with_params(
        &base,
        &[("tqx", "out:csv"), ("sheet", config.sheet_name.as_str())],
    )
    .map_err(|e| RackError::InvalidSheetUrl(e.to_string()))?;

    Ok(export.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_sheet_id() {
        assert_eq!(
            extract_sheet_id("https://docs.google.com/spreadsheets/d/abc_123-X/edit?usp=sharing"),
            Some("abc_123-X")
        );
        assert_eq!(extract_sheet_id(""), None);
    }

    #[test]
    fn test_export_url_google() {
        let mut config =
            Config::with_url("https://docs.google.com/spreadsheets/d/abc123/edit#gid=0");
        config.sheet_name = "Book Stock".to_string();
        let url = export_url(&config).unwrap();
        assert_eq!(
            url,
            "https://docs.google.com/spreadsheets/d/abc123/gviz/tq?tqx=out%3Acsv&sheet=Book+Stock"
        );
    }

    #[test]
    fn test_export_url_direct_csv() {
        let config = Config::with_url("https://example.com/data/books.csv?v=2");
        assert_eq!(
            export_url(&config).unwrap(),
            "https://example.com/data/books.csv?v=2"
        );
    }

    #[test]
    fn test_export_url_published_link_kept() {
        let raw = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQ/pub?output=csv";
        assert_eq!(export_url(&Config::with_url(raw)).unwrap(), raw);
    }

    #[test]
    fn test_export_url_not_configured() {
        assert!(matches!(
            export_url(&Config::default()),
            Err(RackError::NotConfigured)
        ));
    }

    #[test]
    fn test_export_url_invalid() {
        assert!(matches!(
            export_url(&Config::with_url("not a url")),
            Err(RackError::InvalidSheetUrl(_))
        ));
        assert!(matches!(
            export_url(&Config::with_url("ftp://example.com/books.csv")),
            Err(RackError::InvalidSheetUrl(_))
        ));
        assert!(matches!(
            export_url(&Config::with_url("https://docs.google.com/spreadsheets/")),
            Err(RackError::InvalidSheetUrl(_))
        ));
    }
}
