//! Response schemas for the Roblox web APIs.
//!
//! Each endpoint class gets an explicit shape. Anything that does not
//! decode into its shape is a lookup failure; the aggregator decides
//! whether that failure is fatal.

use crate::error::LookupError;
use crate::models::{Badge, GroupMembership, Presence, PresenceKind, NO_DESCRIPTION};
use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::Deserialize;

/// The `{"data": [...]}` envelope shared by most list endpoints.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
}

/// One username search hit.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: u64,
}

impl Page<SearchHit> {
    /// ID of the first hit, if any.
    pub fn first_id(&self) -> Option<u64> {
        self.data.first().map(|hit| hit.id)
    }
}

/// `GET /v1/users/{id}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: u64,
    pub name: String,
    pub display_name: String,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
    pub is_banned: bool,
}

impl UserResponse {
    /// The description, or the placeholder when absent or blank.
    pub fn description_or_default(&self) -> String {
        match self.description.as_deref() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => NO_DESCRIPTION.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailEntry {
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Page<ThumbnailEntry> {
    pub fn image_url(self) -> Result<String, LookupError> {
        self.data
            .into_iter()
            .next()
            .and_then(|entry| entry.image_url)
            .filter(|url| !url.trim().is_empty())
            .ok_or(LookupError::MissingField("imageUrl"))
    }
}

/// `{"count": n}` from the friends service.
#[derive(Debug, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub member_count: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct RoleInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rank: u32,
}

#[derive(Debug, Deserialize)]
pub struct GroupRoleEntry {
    pub group: GroupInfo,
    #[serde(default)]
    pub role: RoleInfo,
}

impl From<GroupRoleEntry> for GroupMembership {
    fn from(entry: GroupRoleEntry) -> Self {
        GroupMembership {
            group_id: entry.group.id,
            group_name: entry.group.name,
            role_name: entry.role.name,
            rank: entry.role.rank,
            member_count: entry.group.member_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BadgeEntry {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

impl From<BadgeEntry> for Badge {
    fn from(entry: BadgeEntry) -> Self {
        Badge {
            id: entry.id,
            name: entry.name,
        }
    }
}

/// Favorite games are only counted, so entries are not decoded.
pub type FavoritesPage = Page<IgnoredAny>;

/// `POST /v1/presence/users`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceResponse {
    pub user_presences: Vec<UserPresence>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPresence {
    pub user_id: u64,
    #[serde(default)]
    pub user_presence_type: Option<u8>,
    #[serde(default)]
    pub last_location: Option<String>,
    #[serde(default)]
    pub place_id: Option<u64>,
    #[serde(default)]
    pub universe_id: Option<u64>,
    #[serde(default)]
    pub last_online: Option<DateTime<Utc>>,
}

impl PresenceResponse {
    /// Presence entry for `user_id`.
    pub fn for_user(self, user_id: u64) -> Result<Presence, LookupError> {
        let entry = self
            .user_presences
            .into_iter()
            .find(|p| p.user_id == user_id)
            .ok_or(LookupError::MissingField("userPresences"))?;

        Ok(Presence {
            status: entry.user_presence_type.and_then(PresenceKind::from_code),
            last_location: entry.last_location.filter(|s| !s.is_empty()),
            place_id: entry.place_id,
            universe_id: entry.universe_id,
            last_online: entry.last_online,
        })
    }
}
