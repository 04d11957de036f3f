//! The cached home timeline.

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;

use crate::application::feed::{FeedError, FeedService};
use crate::application::pagination::requested_page;
use crate::cache::{TimelineCache, TimelineView};
use crate::presentation::views::{IndexView, RenderError, render_json};

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Clone)]
pub struct TimelineService {
    feed: FeedService,
    cache: Arc<TimelineCache>,
}

impl TimelineService {
    pub fn new(feed: FeedService, cache: Arc<TimelineCache>) -> Self {
        Self { feed, cache }
    }

    pub fn cache(&self) -> &TimelineCache {
        &self.cache
    }

    /// Rendered global timeline for `page`. Repeated calls inside the TTL
    /// return identical bytes, even if posts were added or removed meanwhile.
    pub async fn render_index(&self, page: Option<&str>) -> Result<Bytes, TimelineError> {
        let render = || async {
            let listing = self.feed.global_timeline(page).await?;
            Ok::<Bytes, TimelineError>(render_json(&IndexView::from(&listing))?)
        };

        match self.cache.key_for(TimelineView::Index, requested_page(page)) {
            Some(key) => self.cache.get_or_compute(key, render).await,
            None => render().await,
        }
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
