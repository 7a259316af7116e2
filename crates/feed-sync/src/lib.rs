//! # feed-sync
//!
//! External calendar feed synchronization for the booking engine.
//!
//! The booking calendar is only trustworthy if it reflects every channel a
//! property is listed on, so an external scheduler calls
//! [`SyncService::resync`](sync::SyncService::resync) periodically (every
//! 15 minutes is typical; this crate never schedules itself). Each feed is
//! fetched with its own timeout and failures are isolated per feed: one
//! dead channel manager degrades the data, it never breaks the cycle.
//!
//! The network sits behind the narrow [`FeedFetcher`](fetcher::FeedFetcher)
//! trait, keeping HTTP a black-box collaborator the tests can replace.
//!
//! ## Modules
//!
//! - [`sync`] — the resync orchestration
//! - [`fetcher`] — the transport seam and its live HTTP implementation
//! - [`error`] — error types

pub mod error;
pub mod fetcher;
pub mod sync;

pub use error::SyncError;
pub use fetcher::{FeedFetcher, HttpFeedFetcher, FEED_TIMEOUT_SECS};
pub use sync::SyncService;
