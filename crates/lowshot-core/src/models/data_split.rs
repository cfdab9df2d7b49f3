use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Which slice of a task's dataset a session runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSplit {
    /// Reduced dataset for fast smoke runs.
    Sample,
    /// The complete dataset.
    Full,
}

impl DataSplit {
    fn as_str(&self) -> &'static str {
        match self {
            DataSplit::Sample => "sample",
            DataSplit::Full => "full",
        }
    }
}

impl fmt::Display for DataSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSplit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sample" => Ok(DataSplit::Sample),
            "full" => Ok(DataSplit::Full),
            other => Err(ConfigError::ValidationFailed {
                field: "data_split".into(),
                message: format!("unknown data split `{other}`"),
            }),
        }
    }
}
