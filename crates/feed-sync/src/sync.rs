//! Resync orchestration: pull every configured feed, isolate failures, and
//! replace the engine's imported event set.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{info, warn};

use stay_engine::{BookingEngine, CalendarEvent};

use crate::fetcher::FeedFetcher;

pub struct SyncService<F> {
    engine: Arc<BookingEngine>,
    fetcher: F,
}

impl<F: FeedFetcher> SyncService<F> {
    pub fn new(engine: Arc<BookingEngine>, fetcher: F) -> Self {
        Self { engine, fetcher }
    }

    /// Run one synchronization cycle over `urls`, fetched concurrently.
    ///
    /// The union of every feed that succeeded replaces the imported set
    /// wholesale (last-write-wins, never merged incrementally). A feed
    /// that fails to download is logged and contributes nothing this
    /// cycle; it never aborts the others. When every feed fails the
    /// previous imported set stays authoritative until a cycle succeeds.
    ///
    /// `now` stamps imported events that carry no DTSTAMP of their own.
    pub async fn resync(&self, urls: &[String], now: DateTime<Utc>) {
        if urls.is_empty() {
            return;
        }

        let fetches = urls.iter().map(|url| self.fetch_feed(url, now));
        let results = join_all(fetches).await;

        if results.iter().all(Option::is_none) {
            warn!("every calendar feed failed; keeping the previous imported set");
            return;
        }

        let events: Vec<CalendarEvent> = results.into_iter().flatten().flatten().collect();
        info!(count = events.len(), "calendar feeds synchronised");
        self.engine.replace_channel_events(events);
    }

    /// One feed's contribution. `None` marks a failed download; a feed
    /// that downloads but parses to nothing still counts as a successful,
    /// empty contribution.
    async fn fetch_feed(&self, url: &str, now: DateTime<Utc>) -> Option<Vec<CalendarEvent>> {
        let body = match self.fetcher.fetch(url).await {
            Ok(body) => body,
            Err(error) => {
                warn!(%url, %error, "failed to download calendar feed");
                return None;
            }
        };

        Some(
            ical_core::decode(&body)
                .into_iter()
                .map(|event| CalendarEvent::from_import(event, now))
                .collect(),
        )
    }
}
