use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{CHECKPOINTS_PER_STAGE, MT_CHECKPOINTS_PER_STAGE, SEED_ROUNDS_PER_STAGE};
use crate::errors::ConfigError;

/// The four task families the benchmark service runs.
///
/// The problem type decides the session cadence: machine translation
/// has no seed rounds and doubles the checkpoint count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    ImageClassification,
    ObjectDetection,
    MachineTranslation,
    VideoClassification,
}

impl ProblemType {
    /// Every problem type, in the order runs iterate them.
    pub const ALL: [ProblemType; 4] = [
        ProblemType::ImageClassification,
        ProblemType::ObjectDetection,
        ProblemType::MachineTranslation,
        ProblemType::VideoClassification,
    ];

    /// Seed label rounds at the start of each stage.
    pub fn seed_rounds(&self) -> usize {
        match self {
            ProblemType::MachineTranslation => 0,
            _ => SEED_ROUNDS_PER_STAGE,
        }
    }

    /// Checkpoints each stage runs before the stage ends.
    pub fn checkpoints_per_stage(&self) -> usize {
        match self {
            ProblemType::MachineTranslation => MT_CHECKPOINTS_PER_STAGE,
            _ => CHECKPOINTS_PER_STAGE,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            ProblemType::ImageClassification => "image_classification",
            ProblemType::ObjectDetection => "object_detection",
            ProblemType::MachineTranslation => "machine_translation",
            ProblemType::VideoClassification => "video_classification",
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProblemType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image_classification" => Ok(ProblemType::ImageClassification),
            "object_detection" => Ok(ProblemType::ObjectDetection),
            "machine_translation" => Ok(ProblemType::MachineTranslation),
            "video_classification" => Ok(ProblemType::VideoClassification),
            other => Err(ConfigError::ValidationFailed {
                field: "problem_type".into(),
                message: format!("unknown problem type `{other}`"),
            }),
        }
    }
}
