use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outcome of the attrition classifier.
///
/// `Oui` is the positive class (the employee is predicted to resign).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum Label {
    Oui,
    Non,
}

impl Label {
    /// Returns the string stored in the database and sent over the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Oui => "Oui",
            Self::Non => "Non",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown label: {}", self.0)
    }
}

impl std::error::Error for UnknownLabel {}

impl FromStr for Label {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Oui" => Ok(Self::Oui),
            "Non" => Ok(Self::Non),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}
