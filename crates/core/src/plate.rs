//! License plate normalization and validation.
//!
//! Free-text input is canonicalized (whitespace stripped, upper-cased) and
//! then accepted against two patterns:
//!
//! - regional: `А123ВС77` / `А123ВС777` using the twelve Cyrillic letters
//!   that have Latin look-alikes;
//! - fallback: 5 to 10 characters of `A-Z0-9`, for everything else.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;

/// Letters allowed on regional plates.
pub const REGIONAL_ALPHABET: &str = "АВЕКМНОРСТУХ";

/// Letter, 3 digits, 2 letters, 2-3 digit region code.
pub const REGIONAL_PATTERN: &str = "^[АВЕКМНОРСТУХ][0-9]{3}[АВЕКМНОРСТУХ]{2}[0-9]{2,3}$";

/// Permissive fallback for other plate conventions.
pub const FALLBACK_PATTERN: &str = "^[A-Z0-9]{5,10}$";

static REGIONAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(REGIONAL_PATTERN).expect("valid regex"));

static FALLBACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(FALLBACK_PATTERN).expect("valid regex"));

/// Canonical form of a plate: all whitespace removed, upper-cased.
///
/// Total: every string maps to some normalized string.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Whether `input`, once normalized, is an accepted plate number.
pub fn validate(input: &str) -> bool {
    is_valid_normalized(&normalize(input))
}

fn is_valid_normalized(normalized: &str) -> bool {
    REGIONAL_RE.is_match(normalized) || FALLBACK_RE.is_match(normalized)
}

/// A normalized plate number that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlateNumber(String);

impl PlateNumber {
    /// Normalize and validate user input.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let normalized = normalize(input);
        if is_valid_normalized(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(CoreError::InvalidPlate(input.trim().to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PlateNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlateNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
