//! Profile resolution and aggregation.
//!
//! Turns an identifier into a `ProfileRecord`: resolve the user ID, fetch
//! the mandatory user record, then fan out to the enrichment lookups. The
//! search and user lookups are fatal on failure; every enrichment falls
//! back to its default.

use crate::error::{LookupError, ResolutionError};
use crate::models::{Badge, GroupMembership, Identifier, Presence, ProfileRecord};
use crate::proxy::{ProxyFetcher, ProxyRequest};
use crate::resolve::pacing::Pacer;
use crate::roblox::schema::{
    BadgeEntry, CountResponse, FavoritesPage, GroupRoleEntry, Page, PresenceResponse, SearchHit,
    ThumbnailEntry, UserResponse,
};
use crate::roblox::Endpoints;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How enrichment lookups are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanOut {
    /// All enrichment calls in flight at once (default)
    #[default]
    Concurrent,
    /// One enrichment call at a time, in a fixed order
    Sequential,
}

/// Configuration for the aggregator.
#[derive(Debug, Clone, Default)]
pub struct AggregatorConfig {
    pub endpoints: Endpoints,
    pub fan_out: FanOut,
    /// Minimum gap between outbound calls. Zero disables pacing.
    pub pacing: Duration,
}

/// Every remote lookup the aggregator performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Search,
    User,
    Avatar,
    Friends,
    Followers,
    Following,
    Groups,
    Badges,
    Favorites,
    Presence,
}

impl Lookup {
    /// Whether a failure of this lookup aborts the resolution.
    pub fn is_mandatory(self) -> bool {
        matches!(self, Lookup::Search | Lookup::User)
    }

    pub fn name(self) -> &'static str {
        match self {
            Lookup::Search => "user search",
            Lookup::User => "user profile",
            Lookup::Avatar => "avatar",
            Lookup::Friends => "friends count",
            Lookup::Followers => "followers count",
            Lookup::Following => "following count",
            Lookup::Groups => "groups",
            Lookup::Badges => "badges",
            Lookup::Favorites => "favorite games",
            Lookup::Presence => "presence",
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Mandatory outcome: any failure becomes `FetchFailed`.
fn require<T>(
    lookup: Lookup,
    subject: &str,
    outcome: Result<T, LookupError>,
) -> Result<T, ResolutionError> {
    debug_assert!(lookup.is_mandatory());
    outcome.map_err(|e| ResolutionError::fetch_failed(lookup.name(), subject, e))
}

/// Enrichment outcome: any failure becomes the field's default.
fn settle<T: Default>(lookup: Lookup, outcome: Result<T, LookupError>) -> T {
    debug_assert!(!lookup.is_mandatory());
    outcome.unwrap_or_else(|e| {
        warn!("{} lookup failed, using default: {}", lookup, e);
        T::default()
    })
}

/// Resolves identifiers into profile records through a `ProxyFetcher`.
pub struct ProfileAggregator<F> {
    fetcher: F,
    endpoints: Endpoints,
    fan_out: FanOut,
    pacer: Pacer,
}

impl<F: ProxyFetcher> ProfileAggregator<F> {
    pub fn new(fetcher: F, config: AggregatorConfig) -> Self {
        debug!(
            "Aggregator: fan-out {:?}, pacing {:?}",
            config.fan_out, config.pacing
        );
        Self {
            fetcher,
            endpoints: config.endpoints,
            fan_out: config.fan_out,
            pacer: Pacer::new(config.pacing),
        }
    }

    /// Resolve `identifier` into a complete profile record.
    ///
    /// Never returns a partial record: either every enrichment has settled
    /// and the record is assembled, or a typed error is returned.
    pub async fn resolve(&self, identifier: &str) -> Result<ProfileRecord, ResolutionError> {
        let identifier = Identifier::parse(identifier);
        if identifier.as_str().is_empty() {
            return Err(ResolutionError::empty_input("identifier"));
        }

        debug!(
            "Identifier '{}' ({})",
            identifier,
            if identifier.is_numeric() { "numeric" } else { "username" }
        );
        let user_id = self.resolve_user_id(&identifier).await?;
        info!("Resolving profile for user {}", user_id);

        let user: UserResponse = require(
            Lookup::User,
            &user_id.to_string(),
            self.lookup(Lookup::User, self.endpoints.user(user_id)).await,
        )?;

        let enrichment = self.enrich(user.id).await;
        let description = user.description_or_default();

        Ok(ProfileRecord {
            id: user.id,
            username: user.name,
            display_name: user.display_name,
            created: user.created,
            description,
            banned: user.is_banned,
            avatar_url: enrichment.avatar_url,
            friends_count: enrichment.friends_count,
            followers_count: enrichment.followers_count,
            following_count: enrichment.following_count,
            groups: enrichment.groups,
            badges: enrichment.badges,
            favorites_count: enrichment.favorites_count,
            presence: enrichment.presence,
        })
    }

    async fn resolve_user_id(&self, identifier: &Identifier) -> Result<u64, ResolutionError> {
        match identifier {
            Identifier::Numeric(digits) => digits
                .parse::<u64>()
                .map_err(|e| ResolutionError::fetch_failed(Lookup::User.name(), digits, e)),
            Identifier::Username(name) => {
                debug!("Searching for username {}", name);
                let page: Page<SearchHit> = require(
                    Lookup::Search,
                    name,
                    self.lookup(Lookup::Search, self.endpoints.search(name)).await,
                )?;

                let user_id = page
                    .first_id()
                    .ok_or_else(|| ResolutionError::user_not_found(name))?;
                debug!("Username {} resolved to {}", name, user_id);
                Ok(user_id)
            }
        }
    }

    /// Issue every enrichment lookup and wait for all of them to settle.
    async fn enrich(&self, user_id: u64) -> Enrichment {
        // Async blocks are lazy, so nothing is sent until they are polled below.
        let avatar_url = async { settle(Lookup::Avatar, self.avatar(user_id).await) };
        let friends_count = async {
            let request = self.endpoints.friends_count(user_id);
            settle(Lookup::Friends, self.count(Lookup::Friends, request).await)
        };
        let followers_count = async {
            let request = self.endpoints.followers_count(user_id);
            settle(Lookup::Followers, self.count(Lookup::Followers, request).await)
        };
        let following_count = async {
            let request = self.endpoints.following_count(user_id);
            settle(Lookup::Following, self.count(Lookup::Following, request).await)
        };
        let groups = async { settle(Lookup::Groups, self.groups(user_id).await) };
        let badges = async { settle(Lookup::Badges, self.badges(user_id).await) };
        let favorites_count =
            async { settle(Lookup::Favorites, self.favorites_count(user_id).await) };
        let presence = async { settle(Lookup::Presence, self.presence(user_id).await) };

        match self.fan_out {
            FanOut::Concurrent => {
                let (
                    avatar_url,
                    friends_count,
                    followers_count,
                    following_count,
                    groups,
                    badges,
                    favorites_count,
                    presence,
                ) = futures::join!(
                    avatar_url,
                    friends_count,
                    followers_count,
                    following_count,
                    groups,
                    badges,
                    favorites_count,
                    presence
                );

                Enrichment {
                    avatar_url,
                    friends_count,
                    followers_count,
                    following_count,
                    groups,
                    badges,
                    favorites_count,
                    presence,
                }
            }
            FanOut::Sequential => Enrichment {
                avatar_url: avatar_url.await,
                friends_count: friends_count.await,
                followers_count: followers_count.await,
                following_count: following_count.await,
                groups: groups.await,
                badges: badges.await,
                favorites_count: favorites_count.await,
                presence: presence.await,
            },
        }
    }

    /// One paced, relayed call decoded into its schema.
    async fn lookup<T: DeserializeOwned>(
        &self,
        lookup: Lookup,
        request: ProxyRequest,
    ) -> Result<T, LookupError> {
        self.pacer.wait().await;
        debug!("Lookup {}: {}", lookup, request.target_url);

        let body = self.fetcher.fetch(&request).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn avatar(&self, user_id: u64) -> Result<Option<String>, LookupError> {
        let page: Page<ThumbnailEntry> = self
            .lookup(Lookup::Avatar, self.endpoints.avatar(user_id))
            .await?;
        page.image_url().map(Some)
    }

    async fn count(&self, lookup: Lookup, request: ProxyRequest) -> Result<u64, LookupError> {
        let response: CountResponse = self.lookup(lookup, request).await?;
        Ok(response.count)
    }

    async fn groups(&self, user_id: u64) -> Result<Vec<GroupMembership>, LookupError> {
        let page: Page<GroupRoleEntry> = self
            .lookup(Lookup::Groups, self.endpoints.groups(user_id))
            .await?;
        Ok(page.data.into_iter().map(Into::into).collect())
    }

    /// First page of badges only, at most `badge_limit` entries.
    async fn badges(&self, user_id: u64) -> Result<Vec<Badge>, LookupError> {
        let page: Page<BadgeEntry> = self
            .lookup(Lookup::Badges, self.endpoints.badges(user_id))
            .await?;
        Ok(page.data.into_iter().map(Into::into).collect())
    }

    /// Size of the first favorites page, capped at `favorites_limit`.
    async fn favorites_count(&self, user_id: u64) -> Result<u64, LookupError> {
        let page: FavoritesPage = self
            .lookup(Lookup::Favorites, self.endpoints.favorite_games(user_id))
            .await?;
        Ok(page.data.len() as u64)
    }

    async fn presence(&self, user_id: u64) -> Result<Presence, LookupError> {
        let response: PresenceResponse = self
            .lookup(Lookup::Presence, self.endpoints.presence(user_id))
            .await?;
        response.for_user(user_id)
    }
}

/// Settled enrichment fields, defaults already substituted.
struct Enrichment {
    avatar_url: Option<String>,
    friends_count: u64,
    followers_count: u64,
    following_count: u64,
    groups: Vec<GroupMembership>,
    badges: Vec<Badge>,
    favorites_count: u64,
    presence: Presence,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PresenceKind, NO_DESCRIPTION};
    use crate::proxy::Method;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory relay keyed by target URL. Unknown URLs answer 404.
    #[derive(Default)]
    struct MockFetcher {
        responses: HashMap<String, Result<Value, LookupError>>,
        requests: Mutex<Vec<ProxyRequest>>,
    }

    impl MockFetcher {
        fn respond(mut self, request: ProxyRequest, body: Value) -> Self {
            self.responses.insert(request.target_url, Ok(body));
            self
        }

        fn fail(mut self, request: ProxyRequest, error: LookupError) -> Self {
            self.responses.insert(request.target_url, Err(error));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.requests()
                .into_iter()
                .map(|request| request.target_url)
                .collect()
        }

        fn requests(&self) -> Vec<ProxyRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProxyFetcher for MockFetcher {
        async fn fetch(&self, request: &ProxyRequest) -> Result<Value, LookupError> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .get(&request.target_url)
                .cloned()
                .unwrap_or(Err(LookupError::Status(404)))
        }
    }

    fn user_body(user_id: u64, name: &str) -> Value {
        json!({
            "description": "Just building things",
            "created": "2015-03-04T12:30:00.000Z",
            "isBanned": false,
            "externalAppDisplayName": null,
            "hasVerifiedBadge": false,
            "id": user_id,
            "name": name,
            "displayName": format!("{} Display", name)
        })
    }

    /// A backend where every lookup for `user_id` succeeds.
    fn full_backend(user_id: u64, name: &str) -> MockFetcher {
        let endpoints = Endpoints::default();
        MockFetcher::default()
            .respond(endpoints.user(user_id), user_body(user_id, name))
            .respond(
                endpoints.avatar(user_id),
                json!({ "data": [{ "targetId": user_id, "state": "Completed", "imageUrl": "https://tr.rbxcdn.com/av.png" }] }),
            )
            .respond(endpoints.friends_count(user_id), json!({ "count": 12 }))
            .respond(endpoints.followers_count(user_id), json!({ "count": 340 }))
            .respond(endpoints.following_count(user_id), json!({ "count": 8 }))
            .respond(
                endpoints.groups(user_id),
                json!({ "data": [
                    { "group": { "id": 1, "name": "Alpha", "memberCount": 10 }, "role": { "id": 5, "name": "Owner", "rank": 255 } },
                    { "group": { "id": 2, "name": "Beta", "memberCount": 20 }, "role": { "id": 6, "name": "Member", "rank": 1 } }
                ]}),
            )
            .respond(
                endpoints.badges(user_id),
                json!({ "previousPageCursor": null, "nextPageCursor": null, "data": [
                    { "id": 100, "name": "Welcome" },
                    { "id": 101, "name": "Veteran" },
                    { "id": 102, "name": "Builder" }
                ]}),
            )
            .respond(
                endpoints.favorite_games(user_id),
                json!({ "data": [{ "id": 1 }, { "id": 2 }] }),
            )
            .respond(
                endpoints.presence(user_id),
                json!({ "userPresences": [{ "userPresenceType": 1, "lastLocation": "Website", "userId": user_id }] }),
            )
    }

    fn aggregator(fetcher: MockFetcher) -> ProfileAggregator<MockFetcher> {
        ProfileAggregator::new(fetcher, AggregatorConfig::default())
    }

    #[tokio::test]
    async fn test_numeric_identifier_skips_search() {
        let agg = aggregator(full_backend(12345678, "Foo"));
        let record = agg.resolve("12345678").await.unwrap();

        assert_eq!(record.id, 12345678);
        assert!(agg.fetcher.calls().iter().all(|url| !url.contains("/users/search")));
    }

    #[tokio::test]
    async fn test_full_record_assembled() {
        let agg = aggregator(full_backend(12345678, "Foo"));
        let record = agg.resolve("12345678").await.unwrap();

        assert_eq!(record.username, "Foo");
        assert_eq!(record.display_name, "Foo Display");
        assert_eq!(record.description, "Just building things");
        assert!(!record.banned);
        assert_eq!(record.avatar_url.as_deref(), Some("https://tr.rbxcdn.com/av.png"));
        assert_eq!(record.friends_count, 12);
        assert_eq!(record.followers_count, 340);
        assert_eq!(record.following_count, 8);
        assert_eq!(record.connections(), 360);
        assert_eq!(record.groups_count(), 2);
        assert_eq!(record.groups[0].role_name, "Owner");
        assert_eq!(record.badges_count(), 3);
        assert_eq!(record.favorites_count, 2);
        assert_eq!(record.presence.status, Some(PresenceKind::Online));
        // One user lookup plus eight enrichments.
        assert_eq!(agg.fetcher.calls().len(), 9);
    }

    #[tokio::test]
    async fn test_username_not_found() {
        let endpoints = Endpoints::default();
        let fetcher = MockFetcher::default().respond(
            endpoints.search("NoSuchUser123"),
            json!({ "previousPageCursor": null, "nextPageCursor": null, "data": [] }),
        );
        let agg = aggregator(fetcher);

        let err = agg.resolve("NoSuchUser123").await.unwrap_err();
        assert_eq!(err, ResolutionError::user_not_found("NoSuchUser123"));
        // Only the search went out; no enrichment was attempted.
        assert_eq!(
            agg.fetcher.calls(),
            vec![endpoints.search("NoSuchUser123").target_url]
        );
    }

    #[tokio::test]
    async fn test_username_resolves_to_search_hit_id() {
        let endpoints = Endpoints::default();
        let fetcher = full_backend(999, "RealUser").respond(
            endpoints.search("RealUser"),
            json!({ "data": [{ "id": 999, "name": "RealUser", "displayName": "Real" }] }),
        );
        let agg = aggregator(fetcher);

        let record = agg.resolve("RealUser").await.unwrap();
        assert_eq!(record.id, 999);

        let requests = agg.fetcher.requests();
        assert_eq!(requests[0].target_url, endpoints.search("RealUser").target_url);
        for request in &requests[1..] {
            assert!(!request.target_url.contains("RealUser"));
            match request.method {
                Method::Get => assert!(
                    request.target_url.contains("999"),
                    "expected user id in {}",
                    request.target_url
                ),
                Method::Post => assert_eq!(request.body, Some(json!({ "userIds": [999] }))),
            }
        }
        assert!(requests.iter().any(|r| r.method == Method::Post));
    }

    #[tokio::test]
    async fn test_search_failure_is_fatal() {
        let endpoints = Endpoints::default();
        let fetcher = MockFetcher::default().fail(
            endpoints.search("RealUser"),
            LookupError::Transport("connection reset".to_string()),
        );
        let agg = aggregator(fetcher);

        let err = agg.resolve("RealUser").await.unwrap_err();
        assert!(matches!(err, ResolutionError::FetchFailed { lookup: "user search", .. }));
        assert_eq!(agg.fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_mandatory_fetch_failure_is_fatal() {
        let endpoints = Endpoints::default();
        let fetcher = full_backend(12345678, "Foo").fail(endpoints.user(12345678), LookupError::Status(500));
        let agg = aggregator(fetcher);

        let err = agg.resolve("12345678").await.unwrap_err();
        assert!(matches!(err, ResolutionError::FetchFailed { lookup: "user profile", .. }));
        // Enrichment never starts once the mandatory fetch fails.
        assert_eq!(agg.fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_nonexistent_numeric_id_fails_at_fetch() {
        let agg = aggregator(MockFetcher::default());
        let err = agg.resolve("404404").await.unwrap_err();
        assert!(matches!(err, ResolutionError::FetchFailed { .. }));
    }

    #[tokio::test]
    async fn test_malformed_user_body_is_fatal() {
        let endpoints = Endpoints::default();
        let fetcher = full_backend(5, "Foo")
            .respond(endpoints.user(5), json!({ "errors": [{ "code": 3, "message": "The user id is invalid." }] }));
        let agg = aggregator(fetcher);

        assert!(matches!(
            agg.resolve("5").await,
            Err(ResolutionError::FetchFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_oversized_numeric_id_fails_without_calls() {
        let agg = aggregator(MockFetcher::default());
        let err = agg.resolve("99999999999999999999999").await.unwrap_err();
        assert!(matches!(err, ResolutionError::FetchFailed { .. }));
        assert!(agg.fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_blank_identifier_rejected_before_any_call() {
        let agg = aggregator(MockFetcher::default());
        assert_eq!(
            agg.resolve("   ").await,
            Err(ResolutionError::empty_input("identifier"))
        );
        assert!(agg.fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_avatar_failure_yields_null() {
        let endpoints = Endpoints::default();
        let fetcher = full_backend(12345678, "Foo")
            .fail(endpoints.avatar(12345678), LookupError::Transport("boom".to_string()));
        let agg = aggregator(fetcher);

        let record = agg.resolve("12345678").await.unwrap();
        assert_eq!(record.avatar_url, None);
        assert_eq!(record.id, 12345678);
        assert_eq!(record.username, "Foo");
        assert_eq!(record.display_name, "Foo Display");
        assert!(!record.banned);
        assert_eq!(record.friends_count, 12);
    }

    #[tokio::test]
    async fn test_each_enrichment_failure_degrades_in_isolation() {
        let endpoints = Endpoints::default();
        let id = 777;
        type Check = fn(&ProfileRecord) -> bool;
        fn case(request: ProxyRequest, check: Check) -> (ProxyRequest, Check) {
            (request, check)
        }

        let cases = vec![
            case(endpoints.avatar(id), |r| r.avatar_url.is_none()),
            case(endpoints.friends_count(id), |r| r.friends_count == 0),
            case(endpoints.followers_count(id), |r| r.followers_count == 0),
            case(endpoints.following_count(id), |r| r.following_count == 0),
            case(endpoints.groups(id), |r| r.groups.is_empty()),
            case(endpoints.badges(id), |r| r.badges.is_empty()),
            case(endpoints.favorite_games(id), |r| r.favorites_count == 0),
            case(endpoints.presence(id), |r| r.presence.is_empty()),
        ];

        let baseline = aggregator(full_backend(id, "Iso")).resolve("777").await.unwrap();

        for (request, is_default) in cases {
            let url = request.target_url.clone();
            let fetcher = full_backend(id, "Iso").fail(request, LookupError::Status(503));
            let record = aggregator(fetcher).resolve("777").await.unwrap();

            assert!(is_default(&record), "field for {} not defaulted", url);
            assert!(!is_default(&baseline), "baseline already default for {}", url);
            assert_eq!(record.username, baseline.username);
        }
    }

    #[tokio::test]
    async fn test_all_enrichments_failing() {
        let endpoints = Endpoints::default();
        let fetcher = MockFetcher::default().respond(endpoints.user(31), user_body(31, "Lonely"));
        let agg = aggregator(fetcher);

        let record = agg.resolve("31").await.unwrap();
        assert_eq!(record.username, "Lonely");
        assert_eq!(record.avatar_url, None);
        assert_eq!(record.friends_count, 0);
        assert_eq!(record.followers_count, 0);
        assert_eq!(record.following_count, 0);
        assert!(record.groups.is_empty());
        assert!(record.badges.is_empty());
        assert_eq!(record.favorites_count, 0);
        assert_eq!(record.presence, Presence::default());
        // Every enrichment was still attempted.
        assert_eq!(agg.fetcher.calls().len(), 9);
    }

    #[tokio::test]
    async fn test_malformed_enrichment_bodies_degrade() {
        let endpoints = Endpoints::default();
        let fetcher = full_backend(8, "Odd")
            .respond(endpoints.friends_count(8), json!({ "count": "many" }))
            .respond(endpoints.groups(8), json!({ "groups": [] }))
            .respond(endpoints.avatar(8), json!({ "data": [] }))
            .respond(endpoints.presence(8), json!({ "userPresences": [{ "userId": 9 }] }));
        let agg = aggregator(fetcher);

        let record = agg.resolve("8").await.unwrap();
        assert_eq!(record.friends_count, 0);
        assert!(record.groups.is_empty());
        assert_eq!(record.avatar_url, None);
        assert!(record.presence.is_empty());
        assert_eq!(record.followers_count, 340);
    }

    #[tokio::test]
    async fn test_paged_counts_read_first_page_only() {
        let endpoints = Endpoints {
            badge_limit: 10,
            favorites_limit: 10,
            ..Endpoints::default()
        };
        let badges: Vec<Value> = (0..10).map(|i| json!({ "id": i, "name": "b" })).collect();
        let favorites: Vec<Value> = (0..10).map(|i| json!({ "id": i })).collect();
        let fetcher = full_backend(5, "Collector")
            .respond(
                endpoints.badges(5),
                json!({ "nextPageCursor": "abc", "data": badges }),
            )
            .respond(
                endpoints.favorite_games(5),
                json!({ "nextPageCursor": "def", "data": favorites }),
            );
        let agg = ProfileAggregator::new(
            fetcher,
            AggregatorConfig {
                endpoints: endpoints.clone(),
                ..AggregatorConfig::default()
            },
        );

        let record = agg.resolve("5").await.unwrap();
        assert_eq!(record.badges_count(), 10);
        assert_eq!(record.favorites_count, 10);

        let calls = agg.fetcher.calls();
        assert_eq!(calls.len(), 9);
        assert!(calls.iter().all(|url| !url.contains("cursor=")));
    }

    #[tokio::test]
    async fn test_missing_description_falls_back() {
        let endpoints = Endpoints::default();
        let mut body = user_body(3, "Quiet");
        body.as_object_mut().unwrap().remove("description");
        let agg = aggregator(full_backend(3, "Quiet").respond(endpoints.user(3), body));

        let record = agg.resolve("3").await.unwrap();
        assert_eq!(record.description, NO_DESCRIPTION);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let agg = aggregator(full_backend(12345678, "Foo"));
        let first = tokio_test::block_on(agg.resolve("12345678"));
        let second = tokio_test::block_on(agg.resolve("12345678"));

        tokio_test::assert_ok!(&first);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_sequential_matches_concurrent() {
        let concurrent = aggregator(full_backend(12345678, "Foo"))
            .resolve("12345678")
            .await
            .unwrap();

        let sequential = ProfileAggregator::new(
            full_backend(12345678, "Foo"),
            AggregatorConfig {
                fan_out: FanOut::Sequential,
                ..AggregatorConfig::default()
            },
        );
        let record = sequential.resolve("12345678").await.unwrap();

        assert_eq!(record, concurrent);
        let calls = sequential.fetcher.calls();
        let endpoints = Endpoints::default();
        assert_eq!(calls[1], endpoints.avatar(12345678).target_url);
        assert_eq!(calls[8], endpoints.presence(12345678).target_url);
    }

    #[tokio::test]
    async fn test_pacing_spaces_calls() {
        let agg = ProfileAggregator::new(
            full_backend(12345678, "Foo"),
            AggregatorConfig {
                pacing: Duration::from_millis(10),
                ..AggregatorConfig::default()
            },
        );

        let start = std::time::Instant::now();
        agg.resolve("12345678").await.unwrap();
        // Nine calls, eight gaps.
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[test]
    fn test_lookup_classification() {
        assert!(Lookup::Search.is_mandatory());
        assert!(Lookup::User.is_mandatory());
        for lookup in [
            Lookup::Avatar,
            Lookup::Friends,
            Lookup::Followers,
            Lookup::Following,
            Lookup::Groups,
            Lookup::Badges,
            Lookup::Favorites,
            Lookup::Presence,
        ] {
            assert!(!lookup.is_mandatory(), "{} should be an enrichment", lookup);
        }
    }
}
