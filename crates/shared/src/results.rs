//! Turning search features into list entries and popup text.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::models::{display_number, Download, FeatureProperties, SENSOR_NAME};

pub const RESULT_ITEM_PREFIX: &str = "result-item-";
pub const HIGHLIGHT_CLASS: &str = "highlighted-result";
pub const SEARCHING_MESSAGE: &str = "Searching...";
pub const NO_RESULTS_MESSAGE: &str = "No images found for the specified criteria.";
pub const NO_DOWNLOADS_MESSAGE: &str = "No download links available.";
pub const NO_VALID_DOWNLOADS_MESSAGE: &str = "No valid download links.";
pub const DOWNLOAD_PROXY_PATH: &str = "/download_proxy";
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Downloads {
    Links(Vec<DownloadLink>),
    /// No `downloads` array, or an empty one.
    NoneAvailable,
    /// Entries present but none had an `href`.
    NoneValid,
}

impl Downloads {
    pub fn from_properties(downloads: Option<&[Option<Download>]>) -> Self {
        let Some(items) = downloads.filter(|d| !d.is_empty()) else {
            return Downloads::NoneAvailable;
        };
        let links: Vec<DownloadLink> = items
            .iter()
            .flatten()
            .filter_map(|d| {
                let href = d.href.as_deref().filter(|h| !h.is_empty())?;
                Some(DownloadLink {
                    label: d
                        .productname
                        .clone()
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| "Download".to_string()),
                    url: download_proxy_url(href),
                })
            })
            .collect();
        if links.is_empty() {
            Downloads::NoneValid
        } else {
            Downloads::Links(links)
        }
    }

    /// Placeholder text when there is nothing to link.
    pub fn empty_message(&self) -> Option<&'static str> {
        match self {
            Downloads::Links(_) => None,
            Downloads::NoneAvailable => Some(NO_DOWNLOADS_MESSAGE),
            Downloads::NoneValid => Some(NO_VALID_DOWNLOADS_MESSAGE),
        }
    }
}

/// One row of the results list.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEntry {
    pub id: String,
    pub dom_id: String,
    pub acquired: String,
    pub sensor: String,
    pub resolution: String,
    pub downloads: Downloads,
}

impl ResultEntry {
    pub fn new(id: &str, props: &FeatureProperties) -> Self {
        ResultEntry {
            id: id.to_string(),
            dom_id: list_item_dom_id(id),
            acquired: format_acquired(&props.acquired),
            sensor: if is_truthy(&props.sensorname) {
                display_value(&props.sensorname)
            } else {
                SENSOR_NAME.to_string()
            },
            resolution: format_resolution(&props.resolution),
            downloads: Downloads::from_properties(props.downloads.as_deref()),
        }
    }

    /// Map popup body; values are escaped since ids come from the server.
    pub fn popup_html(&self) -> String {
        format!(
            "<b>ID:</b> {}<br><b>Date:</b> {}",
            html_escape::encode_safe(&self.id),
            html_escape::encode_safe(&self.acquired)
        )
    }
}

pub fn list_item_dom_id(feature_id: &str) -> String {
    format!("{}{}", RESULT_ITEM_PREFIX, feature_id)
}

/// Route a provider download link through the same-origin proxy.
pub fn download_proxy_url(href: &str) -> String {
    format!("{}?url={}", DOWNLOAD_PROXY_PATH, urlencoding::encode(href))
}

/// Acquisition timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
///
/// Strings without an offset are taken as UTC and numbers as epoch
/// milliseconds. Anything unparsable is shown as received.
pub fn format_acquired(raw: &Value) -> String {
    if !is_truthy(raw) {
        return NOT_AVAILABLE.to_string();
    }
    let parsed = match raw {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n
            .as_f64()
            .and_then(|ms| DateTime::from_timestamp_millis(ms as i64)),
        _ => None,
    };
    match parsed {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => {
            let shown = display_value(raw);
            tracing::error!(acquired = %shown, "Could not parse acquisition date");
            shown
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|n| n.and_utc())
}

/// Ground resolution in metres, whatever JSON type it arrives as. Zero, empty
/// or missing reads as unavailable.
pub fn format_resolution(resolution: &Value) -> String {
    if is_truthy(resolution) {
        format!("{}m", display_value(resolution))
    } else {
        NOT_AVAILABLE.to_string()
    }
}

/// `null`, `false`, `0` and `""` count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text a browser would show when the value is concatenated into a string.
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => display_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Id for a feature the server sent without one: `genid-<millis>-<7 base36 chars>`.
///
/// `random` is a uniform sample from `[0, 1)`.
pub fn generated_feature_id(millis: u64, random: f64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut frac = random.fract().abs();
    let mut suffix = String::with_capacity(7);
    for _ in 0..7 {
        frac *= 36.0;
        let digit = (frac.floor() as usize).min(35);
        frac -= digit as f64;
        suffix.push(DIGITS[digit] as char);
    }
    format!("genid-{}-{}", millis, suffix)
}
