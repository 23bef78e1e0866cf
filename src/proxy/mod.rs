//! CORS relay access.
//!
//! The aggregator never talks to the upstream APIs directly; it hands a
//! `ProxyRequest` to a `ProxyFetcher`.

pub mod fetcher;

pub use fetcher::{HttpProxyFetcher, Method, ProxyFetcher, ProxyRequest, RelayConfig};
