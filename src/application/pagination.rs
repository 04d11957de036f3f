//! Page-number pagination shared by every listing.
//!
//! Requested page tokens come straight from the query string, so resolution
//! never fails: missing or malformed tokens select the first page, numbers
//! below one clamp to the first page and numbers past the end clamp to the
//! last. An empty collection still has one (empty) page.

use serde::Serialize;

/// Fixed-size pager. The size is chosen by the call site, never by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: usize,
}

/// The slice of a collection a page covers, resolved before fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: usize,
    pub num_pages: usize,
    pub total_count: usize,
    pub per_page: usize,
    pub offset: usize,
    pub limit: usize,
}

/// One resolved page of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub total_count: usize,
    pub per_page: usize,
}

impl Paginator {
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn num_pages(&self, total_count: usize) -> usize {
        if total_count == 0 {
            1
        } else {
            total_count.div_ceil(self.per_page)
        }
    }

    /// Resolve a raw page token against a collection of `total_count` items.
    pub fn window(&self, total_count: usize, token: Option<&str>) -> PageWindow {
        let num_pages = self.num_pages(total_count);
        let number = clamp_page_number(parse_page_token(token), num_pages);
        let offset = (number - 1) * self.per_page;
        let limit = self.per_page.min(total_count.saturating_sub(offset));

        PageWindow {
            number,
            num_pages,
            total_count,
            per_page: self.per_page,
            offset,
            limit,
        }
    }

    /// Slice an in-memory collection.
    pub fn paginate<T>(&self, items: Vec<T>, token: Option<&str>) -> Page<T> {
        let window = self.window(items.len(), token);
        let slice = items
            .into_iter()
            .skip(window.offset)
            .take(window.limit)
            .collect();
        window.into_page(slice)
    }
}

impl PageWindow {
    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number: self.number,
            num_pages: self.num_pages,
            total_count: self.total_count,
            per_page: self.per_page,
        }
    }
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next().then(|| self.number + 1)
    }

    /// 1-based index of the first item on this page, 0 when the page is empty.
    pub fn start_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.number - 1) * self.per_page + 1
        }
    }

    /// 1-based index of the last item on this page, 0 when the page is empty.
    pub fn end_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.start_index() + self.items.len() - 1
        }
    }
}

/// The page a token asks for, before clamping against a collection size.
pub fn requested_page(token: Option<&str>) -> usize {
    match parse_page_token(token) {
        None => 1,
        Some(value) if value < 1 => 1,
        Some(value) => usize::try_from(value).unwrap_or(usize::MAX),
    }
}

/// `None` for missing or non-numeric tokens; signed so negatives survive parsing.
fn parse_page_token(token: Option<&str>) -> Option<i128> {
    token.and_then(|raw| raw.trim().parse::<i128>().ok())
}

fn clamp_page_number(requested: Option<i128>, num_pages: usize) -> usize {
    match requested {
        None => 1,
        Some(value) if value < 1 => 1,
        Some(value) => usize::try_from(value).map_or(num_pages, |n| n.min(num_pages)),
    }
}
