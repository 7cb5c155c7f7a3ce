use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a registry entry.
///
/// `Pending` is a pre-registration placeholder, `Registered` is set by a
/// successful registration, and `Tampered` is terminal: it is set only by a
/// failing verification and never cleared automatically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Pending,
    Registered,
    Rejected,
    Tampered,
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Registered => "registered",
            Self::Rejected => "rejected",
            Self::Tampered => "tampered",
        };
        write!(f, "{s}")
    }
}

/// Outcome of a single verification pass over a registered invoice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationResult {
    Intact,
    Tampered,
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Intact => "intact",
            Self::Tampered => "tampered",
        };
        write!(f, "{s}")
    }
}
