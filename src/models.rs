//! Data models for profile reports.
//!
//! This module contains the aggregated profile record, its enrichment
//! types, and the report envelope handed to the renderer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback shown when a profile has no description.
pub const NO_DESCRIPTION: &str = "N/A";

/// A caller-supplied name for the profile to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// All ASCII digits; used directly as the user ID.
    Numeric(String),
    /// Anything else; resolved through the username search.
    Username(String),
}

impl Identifier {
    /// Classify a raw identifier. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Identifier::Numeric(trimmed.to_string())
        } else {
            Identifier::Username(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Identifier::Numeric(s) | Identifier::Username(s) => s,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Identifier::Numeric(_))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Online state reported by the presence lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceKind {
    Offline,
    Online,
    InGame,
    InStudio,
    Invisible,
}

impl PresenceKind {
    /// Map the numeric `userPresenceType` code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(PresenceKind::Offline),
            1 => Some(PresenceKind::Online),
            2 => Some(PresenceKind::InGame),
            3 => Some(PresenceKind::InStudio),
            4 => Some(PresenceKind::Invisible),
            _ => None,
        }
    }

    /// Returns an emoji representation of the presence.
    pub fn emoji(&self) -> &'static str {
        match self {
            PresenceKind::Offline | PresenceKind::Invisible => "⚫",
            PresenceKind::Online => "🟢",
            PresenceKind::InGame => "🎮",
            PresenceKind::InStudio => "🛠️",
        }
    }
}

impl fmt::Display for PresenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresenceKind::Offline => write!(f, "Offline"),
            PresenceKind::Online => write!(f, "Online"),
            PresenceKind::InGame => write!(f, "In Game"),
            PresenceKind::InStudio => write!(f, "In Studio"),
            PresenceKind::Invisible => write!(f, "Invisible"),
        }
    }
}

/// Presence snapshot. The default (all fields absent) serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PresenceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub universe_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_online: Option<DateTime<Utc>>,
}

impl Presence {
    pub fn is_empty(&self) -> bool {
        *self == Presence::default()
    }
}

/// A group the user belongs to, with their role in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembership {
    pub group_id: u64,
    pub group_name: String,
    pub role_name: String,
    pub rank: u32,
    pub member_count: u64,
}

/// A badge awarded to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub id: u64,
    pub name: String,
}

/// The aggregated profile of one user.
///
/// Identity fields come from the mandatory user lookup; everything else is
/// an enrichment that falls back to its default when its lookup fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: u64,
    pub username: String,
    pub display_name: String,
    pub created: DateTime<Utc>,
    /// Profile description, or [`NO_DESCRIPTION`].
    pub description: String,
    pub banned: bool,
    pub avatar_url: Option<String>,
    pub friends_count: u64,
    pub followers_count: u64,
    pub following_count: u64,
    pub groups: Vec<GroupMembership>,
    pub badges: Vec<Badge>,
    pub favorites_count: u64,
    pub presence: Presence,
}

impl ProfileRecord {
    /// Friends, followers and followings combined.
    pub fn connections(&self) -> u64 {
        self.friends_count + self.followers_count + self.following_count
    }

    pub fn groups_count(&self) -> usize {
        self.groups.len()
    }

    pub fn badges_count(&self) -> usize {
        self.badges.len()
    }

    /// Link to the public profile page.
    pub fn profile_url(&self) -> String {
        format!("https://www.roblox.com/users/{}/profile", self.id)
    }
}

/// Metadata about the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Platform name as the user typed it.
    pub platform: String,
    /// Why the check was requested.
    pub reason: String,
    /// Identifier the user submitted.
    pub requested_identifier: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Duration of the resolution in seconds.
    pub duration_seconds: f64,
}

/// The complete background-check report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub profile: ProfileRecord,
}
