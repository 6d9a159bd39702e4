use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseEnumError;

/// Stage of the planning workflow, used to pick guidance text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Planning,
    Decomposition,
    TaskGeneration,
    Reporting,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Decomposition => "decomposition",
            Self::TaskGeneration => "task_generation",
            Self::Reporting => "reporting",
        }
    }
}

impl FromStr for Phase {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planning" => Ok(Self::Planning),
            "decomposition" => Ok(Self::Decomposition),
            "task_generation" => Ok(Self::TaskGeneration),
            "reporting" => Ok(Self::Reporting),
            _ => Err(ParseEnumError::new(
                "phase",
                s,
                "planning, decomposition, task_generation, reporting",
            )),
        }
    }
}
