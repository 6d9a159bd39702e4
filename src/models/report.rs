use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseEnumError;

/// How new content is written to an iteration's development report.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Add a timestamped separator and the content to the end of the report.
    #[default]
    Append,
    /// Replace the whole report with the content.
    Overwrite,
}

impl ReportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Overwrite => "overwrite",
        }
    }
}

impl FromStr for ReportMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(Self::Append),
            "overwrite" => Ok(Self::Overwrite),
            _ => Err(ParseEnumError::new("report mode", s, "append, overwrite")),
        }
    }
}
