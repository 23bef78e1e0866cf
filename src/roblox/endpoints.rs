//! Target URLs for each lookup.
//!
//! These are the upstream Roblox URLs; the proxy fetcher wraps them
//! before anything goes on the wire.

use crate::proxy::ProxyRequest;
use reqwest::Url;
use serde_json::json;

const USERS_API: &str = "https://users.roblox.com";
const THUMBNAILS_API: &str = "https://thumbnails.roblox.com";
const FRIENDS_API: &str = "https://friends.roblox.com";
const GROUPS_API: &str = "https://groups.roblox.com";
const BADGES_API: &str = "https://badges.roblox.com";
const GAMES_API: &str = "https://games.roblox.com";
const PRESENCE_API: &str = "https://presence.roblox.com";

/// Page sizes accepted by the cursor-paged users and badges endpoints.
pub const PAGE_SIZES: [u32; 4] = [10, 25, 50, 100];

/// Page sizes accepted by the favorite games endpoint.
pub const FAVORITES_PAGE_SIZES: [u32; 3] = [10, 25, 50];

/// Builds requests for every endpoint class.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub search_limit: u32,
    pub avatar_size: String,
    pub badge_limit: u32,
    pub favorites_limit: u32,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            search_limit: 10,
            avatar_size: "48x48".to_string(),
            badge_limit: 100,
            favorites_limit: 50,
        }
    }
}

impl Endpoints {
    pub fn search(&self, keyword: &str) -> ProxyRequest {
        let mut url = Url::parse(USERS_API).expect("static API base is a valid URL");
        url.set_path("/v1/users/search");
        url.query_pairs_mut()
            .append_pair("keyword", keyword)
            .append_pair("limit", &self.search_limit.to_string());
        ProxyRequest::get(url.to_string())
    }

    pub fn user(&self, user_id: u64) -> ProxyRequest {
        ProxyRequest::get(format!("{}/v1/users/{}", USERS_API, user_id))
    }

    pub fn avatar(&self, user_id: u64) -> ProxyRequest {
        ProxyRequest::get(format!(
            "{}/v1/users/avatar?userIds={}&size={}&format=Png",
            THUMBNAILS_API, user_id, self.avatar_size
        ))
    }

    pub fn friends_count(&self, user_id: u64) -> ProxyRequest {
        ProxyRequest::get(format!("{}/v1/users/{}/friends/count", FRIENDS_API, user_id))
    }

    pub fn followers_count(&self, user_id: u64) -> ProxyRequest {
        ProxyRequest::get(format!(
            "{}/v1/users/{}/followers/count",
            FRIENDS_API, user_id
        ))
    }

    pub fn following_count(&self, user_id: u64) -> ProxyRequest {
        ProxyRequest::get(format!(
            "{}/v1/users/{}/followings/count",
            FRIENDS_API, user_id
        ))
    }

    pub fn groups(&self, user_id: u64) -> ProxyRequest {
        ProxyRequest::get(format!("{}/v1/users/{}/groups/roles", GROUPS_API, user_id))
    }

    pub fn badges(&self, user_id: u64) -> ProxyRequest {
        ProxyRequest::get(format!(
            "{}/v1/users/{}/badges?limit={}&sortOrder=Desc",
            BADGES_API, user_id, self.badge_limit
        ))
    }

    pub fn favorite_games(&self, user_id: u64) -> ProxyRequest {
        ProxyRequest::get(format!(
            "{}/v2/users/{}/favorite/games?limit={}",
            GAMES_API, user_id, self.favorites_limit
        ))
    }

    pub fn presence(&self, user_id: u64) -> ProxyRequest {
        ProxyRequest::post(
            format!("{}/v1/presence/users", PRESENCE_API),
            json!({ "userIds": [user_id] }),
        )
    }
}
