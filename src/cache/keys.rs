//! Cache key definitions.

/// Rendered views that go through the timeline cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimelineView {
    /// The unfiltered home timeline.
    Index,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimelineKey {
    pub view: TimelineView,
    /// Requested page number; `None` when pages share an entry.
    pub page: Option<usize>,
}

impl TimelineKey {
    pub fn paged(view: TimelineView, page: usize) -> Self {
        Self {
            view,
            page: Some(page),
        }
    }

    pub fn shared(view: TimelineView) -> Self {
        Self { view, page: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paged_keys_differ_by_page() {
        assert_ne!(
            TimelineKey::paged(TimelineView::Index, 1),
            TimelineKey::paged(TimelineView::Index, 2)
        );
        assert_eq!(
            TimelineKey::shared(TimelineView::Index),
            TimelineKey::shared(TimelineView::Index)
        );
    }
}
