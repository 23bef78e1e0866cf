//! Roblox web API surface: endpoint URLs and response schemas.

pub mod endpoints;
pub mod schema;

pub use endpoints::{Endpoints, FAVORITES_PAGE_SIZES, PAGE_SIZES};
