//! Card catalog access: decoding, filtering, caching and request tracking.

mod cache;
mod card;
mod client;
mod error;
pub mod filter;
mod request;

pub use card::{CardRecord, Color};
pub use client::CatalogClient;
pub use error::CatalogError;
pub use filter::FilterConfiguration;
pub use request::RequestTracker;

#[cfg(test)]
pub(crate) use card::fixtures;
