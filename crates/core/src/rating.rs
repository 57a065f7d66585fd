//! The four-level rating scale and its binary classification.
//!
//! | level       | karma change | action type |
//! |-------------|--------------|-------------|
//! | `excellent` | +3           | positive    |
//! | `positive`  | +1           | positive    |
//! | `negative`  | -1           | negative    |
//! | `terrible`  | -3           | negative    |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Binary classification stored on every karma action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Positive,
    Negative,
}

impl ActionType {
    /// Value stored in the `karma_actions.action_type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            other => Err(CoreError::Validation(format!(
                "Invalid action type '{other}'. Must be one of: positive, negative"
            ))),
        }
    }
}

/// A user's qualitative judgment of a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingLevel {
    Excellent,
    Positive,
    Negative,
    Terrible,
}

impl RatingLevel {
    /// All levels, best first.
    pub const ALL: [RatingLevel; 4] = [
        Self::Excellent,
        Self::Positive,
        Self::Negative,
        Self::Terrible,
    ];

    /// Signed delta applied to the plate's karma.
    pub fn karma_change(self) -> i32 {
        match self {
            Self::Excellent => 3,
            Self::Positive => 1,
            Self::Negative => -1,
            Self::Terrible => -3,
        }
    }

    /// Counter this level increments.
    pub fn action_type(self) -> ActionType {
        match self {
            Self::Excellent | Self::Positive => ActionType::Positive,
            Self::Negative | Self::Terrible => ActionType::Negative,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Terrible => "terrible",
        }
    }
}

impl fmt::Display for RatingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RatingLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid rating level '{s}'. Must be one of: excellent, positive, negative, terrible"
                ))
            })
    }
}
