//! Sanity check of the `CSV_URL` constant embedded in the widget page.
//!
//! The page must point at the CSV export of a published Google sheet. Missing recommended query parameters only
//! produce warnings.

use std::{fmt, fs::read_to_string, path::Path};

use anyhow::Result;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use thiserror::Error;

pub static DEFAULT_PAGE: &str = "index.html";

static CSV_URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"const\s+CSV_URL\s*=\s*"([^"]*)"\s*;"#).unwrap());
static OUTPUT_CSV_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[?&]output=csv\b").unwrap());
static GID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[?&]gid=\d+\b").unwrap());
static SINGLE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[?&]single=true\b").unwrap());

static PLACEHOLDERS: [&str; 4] = [
    "",
    "YOUR_CSV_URL_HERE",
    "PASTE_YOUR_PUBLIC_EVENTS_CSV_URL_HERE",
    "PASTE_YOUR_CSV_URL_HERE",
];
static SHEETS_PREFIXES: [&str; 2] = [
    "https://docs.google.com/spreadsheets/",
    "http://docs.google.com/spreadsheets/",
];

/// Reasons for the page to fail the check.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigCheckError {
    #[error("Could not find CSV_URL in the page")]
    MissingCsvUrl,

    #[error("CSV_URL is a placeholder or empty: \"{0}\"")]
    Placeholder(String),

    #[error("CSV_URL is not a docs.google.com/spreadsheets URL: \"{0}\"")]
    NotGoogleSheets(String),

    #[error("CSV_URL must include output=csv: \"{0}\"")]
    MissingCsvOutput(String),
}

/// Recommended but optional parts of the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigWarning {
    MissingGid,
    MissingSingle,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::MissingGid => write!(f, "CSV_URL does not include gid=... (continuing)."),
            ConfigWarning::MissingSingle => {
                write!(f, "CSV_URL does not include single=true (continuing).")
            }
        }
    }
}

/// A page which passed the check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub csv_url: String,
    pub warnings: Vec<ConfigWarning>,
}

/// Check the page at `path`.
pub fn check_file(path: &Path) -> Result<CheckReport> {
    let html = read_to_string(path)?;
    let report = check_html(&html)?;
    Ok(report)
}

/// Check the `CSV_URL` constant of an HTML page.
pub fn check_html(html: &str) -> Result<CheckReport, ConfigCheckError> {
    let csv_url = find_csv_url(html).ok_or(ConfigCheckError::MissingCsvUrl)?;
    check_url(&csv_url)?;
    let mut warnings = vec![];
    if !GID_REGEX.is_match(&csv_url) {
        warnings.push(ConfigWarning::MissingGid);
    }
    if !SINGLE_REGEX.is_match(&csv_url) {
        warnings.push(ConfigWarning::MissingSingle);
    }
    for warning in &warnings {
        warn!("{warning}");
    }
    Ok(CheckReport { csv_url, warnings })
}

/// Find the trimmed `CSV_URL` value in the inline scripts of the page.
///
/// Only `<script>` bodies are searched. A declaration in markup text or an HTML comment is not the one the widget
/// runs, so it does not count.
fn find_csv_url(html: &str) -> Option<String> {
    let dom = Html::parse_document(html);
    let script_selector = Selector::parse("script").unwrap();
    dom.select(&script_selector).find_map(|script| {
        let text: String = script.text().collect();
        CSV_URL_REGEX
            .captures(&text)
            .map(|captures| captures[1].trim().to_string())
    })
}

fn check_url(csv_url: &str) -> Result<(), ConfigCheckError> {
    if PLACEHOLDERS.contains(&csv_url) {
        return Err(ConfigCheckError::Placeholder(csv_url.to_string()));
    }
    if !SHEETS_PREFIXES
        .iter()
        .any(|prefix| csv_url.starts_with(prefix))
    {
        return Err(ConfigCheckError::NotGoogleSheets(csv_url.to_string()));
    }
    if !OUTPUT_CSV_REGEX.is_match(csv_url) {
        return Err(ConfigCheckError::MissingCsvOutput(csv_url.to_string()));
    }
    Ok(())
}
