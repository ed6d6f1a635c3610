//! Spam pattern records and their on-disk shape

use chrono::{Local, NaiveDateTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Severity class of a stored pattern, which decides its weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternCategory {
    /// Name of a gambling site
    SiteName,
    /// Gambling vocabulary
    Keywords,
    /// Anything else, including learned comment texts
    Generic,
}

impl PatternCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternCategory::SiteName => "gambling_site_name",
            PatternCategory::Keywords => "gambling_keywords",
            PatternCategory::Generic => "gambling",
        }
    }
}

impl Serialize for PatternCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Unknown tags fall back to Generic instead of failing the whole load
impl<'de> Deserialize<'de> for PatternCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(match tag.as_str() {
            "gambling_site_name" => PatternCategory::SiteName,
            "gambling_keywords" => PatternCategory::Keywords,
            _ => PatternCategory::Generic,
        })
    }
}

impl std::str::FromStr for PatternCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "site" | "site_name" | "sitename" | "gambling_site_name" => Ok(PatternCategory::SiteName),
            "keyword" | "keywords" | "gambling_keywords" => Ok(PatternCategory::Keywords),
            "generic" | "gambling" => Ok(PatternCategory::Generic),
            other => Err(format!("unknown pattern category: {}", other)),
        }
    }
}

impl std::fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted spam pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpamPattern {
    /// Regular expression matched against the raw comment text
    pub pattern: String,
    /// Weight class
    #[serde(rename = "type")]
    pub category: PatternCategory,
    /// When the pattern entered the store
    #[serde(rename = "added_date", with = "added_date_format")]
    pub added_at: NaiveDateTime,
}

impl SpamPattern {
    /// Create a pattern stamped with the current local time.
    pub fn new(pattern: impl Into<String>, category: PatternCategory) -> Self {
        Self {
            pattern: pattern.into(),
            category,
            added_at: now_to_seconds(),
        }
    }
}

// The file format has second precision
fn now_to_seconds() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// A pattern together with its compiled regex.
///
/// Patterns that fail to compile are kept (they are still part of the
/// persisted store) but never match.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub record: SpamPattern,
    pub regex: Option<Regex>,
}

impl CompiledPattern {
    pub fn compile(record: SpamPattern) -> Self {
        let regex = match Regex::new(&record.pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::debug!("Pattern {:?} does not compile, it will be skipped: {}", record.pattern, e);
                None
            }
        };
        Self { record, regex }
    }

    /// Whether the pattern matches `text`. Invalid patterns never match.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().map_or(false, |re| re.is_match(text))
    }
}

/// `added_date` is stored as local wall-clock time, `YYYY-MM-DD HH:MM:SS`.
mod added_date_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
