//! Policy for import locations that resolve to nothing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::location::ImportLocation;
use crate::logging::Logger;

/// What to do when an import location cannot be found.
///
/// Locations marked `optional:` are always ignored.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum NotFoundAction {
    /// Abort the resolution run.
    #[default]
    Fail,
    /// Log the miss and continue without the location.
    Ignore,
}

impl NotFoundAction {
    /// Apply the policy to a not-found failure for `location`.
    ///
    /// # Errors
    ///
    /// Returns `err` unchanged under [`NotFoundAction::Fail`] unless the
    /// location is optional.
    pub fn handle(self, logger: &Logger, location: &ImportLocation, err: Error) -> Result<()> {
        if self == Self::Fail && !location.is_optional() {
            return Err(err);
        }
        logger.trace(&format!("Ignoring missing config location '{location}': {err}"));
        Ok(())
    }
}

impl fmt::Display for NotFoundAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => write!(f, "fail"),
            Self::Ignore => write!(f, "ignore"),
        }
    }
}

impl FromStr for NotFoundAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "ignore" => Ok(Self::Ignore),
            other => Err(Error::Validation {
                field: "on_not_found".to_string(),
                message: format!("expected 'fail' or 'ignore', got '{other}'"),
            }),
        }
    }
}
