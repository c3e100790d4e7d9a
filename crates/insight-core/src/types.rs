use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InsightError;

/// One headline sentence about the most notable entity in a batch.
///
/// `text` carries `<strong>` emphasis around interpolated values; consumers
/// render it as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub entity_name: String,
    pub title: String,
    pub text: String,
    pub tags: Vec<String>,
}

impl Insight {
    pub fn new(
        entity_name: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            title: title.into(),
            text: text.into(),
            tags,
        }
    }

    /// Neutral copy returned when a selector receives no rows.
    pub fn no_data(subject: &str) -> Self {
        Self {
            entity_name: String::new(),
            title: "No data".to_string(),
            text: format!("Not enough {} to compare.", subject),
            tags: Vec::new(),
        }
    }

    pub fn is_no_data(&self) -> bool {
        self.entity_name.is_empty() && self.title == "No data"
    }
}

/// Period-over-period or year-over-year comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMode {
    #[default]
    Pop,
    Yoy,
}

impl ComparisonMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonMode::Pop => "pop",
            ComparisonMode::Yoy => "yoy",
        }
    }

    /// Short tag used in insight tags ("PoP" / "YoY").
    pub fn tag(&self) -> &'static str {
        match self {
            ComparisonMode::Pop => "PoP",
            ComparisonMode::Yoy => "YoY",
        }
    }

    /// Trailing phrase for sentences ("vs last period").
    pub fn phrase(&self) -> &'static str {
        match self {
            ComparisonMode::Pop => "vs last period",
            ComparisonMode::Yoy => "vs last year",
        }
    }
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonMode {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pop" | "period" => Ok(ComparisonMode::Pop),
            "yoy" | "year" => Ok(ComparisonMode::Yoy),
            other => Err(InsightError::InvalidArgument(format!(
                "unknown comparison mode '{}', expected 'pop' or 'yoy'",
                other
            ))),
        }
    }
}
