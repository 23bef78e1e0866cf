//! Form submission handling.
//!
//! Validates the three user-supplied strings before anything touches the
//! network.

use crate::error::ResolutionError;
use std::fmt;

/// Platform named on the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Roblox,
    /// Anything else; submissions for it are a no-op.
    Unsupported(String),
}

impl Platform {
    /// Case-insensitive match on the platform name.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("roblox") {
            Platform::Roblox
        } else {
            Platform::Unsupported(trimmed.to_string())
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, Platform::Roblox)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Roblox => write!(f, "Roblox"),
            Platform::Unsupported(name) => write!(f, "{}", name),
        }
    }
}

/// A validated background-check request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub identifier: String,
    pub platform: Platform,
    pub reason: String,
}

impl FormSubmission {
    /// Trim and validate the form fields. Blank identifier or reason is rejected.
    pub fn new(identifier: &str, platform: &str, reason: &str) -> Result<Self, ResolutionError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ResolutionError::empty_input("username or ID"));
        }

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ResolutionError::empty_input("reason"));
        }

        Ok(Self {
            identifier: identifier.to_string(),
            platform: Platform::parse(platform),
            reason: reason.to_string(),
        })
    }
}
