//! Paginated feed bookkeeping.
//!
//! Tracks the pages fetched so far and answers "what next?". The flattened
//! concatenation of all pages is what the deck reconciles against.

use swipedeck_types::{Page, Profile};

/// Pages of the people feed fetched so far, ordered by page number.
#[derive(Debug, Clone)]
pub struct FeedPages {
    pages: Vec<Page<Profile>>,
    page_size: u32,
}

impl FeedPages {
    /// Create an empty feed with the given page size (minimum 1).
    pub fn new(page_size: u32) -> Self {
        Self {
            pages: Vec::new(),
            page_size: page_size.max(1),
        }
    }

    /// Requested page size.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Store a fetched page, replacing any earlier copy of the same page.
    pub fn push(&mut self, page: Page<Profile>) {
        match self.pages.binary_search_by_key(&page.page, |p| p.page) {
            Ok(index) => self.pages[index] = page,
            Err(index) => self.pages.insert(index, page),
        }
    }

    /// The page to fetch next: page 1 when nothing is loaded, otherwise the
    /// page after the last one while the backend reports more.
    pub fn next_page(&self) -> Option<u32> {
        match self.pages.last() {
            None => Some(1),
            Some(last) => last.next_page(),
        }
    }

    /// Check whether the backend reported further pages.
    pub fn has_more(&self) -> bool {
        self.pages.last().map(|p| p.has_more).unwrap_or(false)
    }

    /// Check whether a page should be requested for a deck of `deck_len`.
    pub fn should_load_more(&self, deck_len: usize, low_water_mark: usize) -> bool {
        deck_len <= low_water_mark && self.has_more()
    }

    /// All profiles across loaded pages, in page order.
    pub fn flattened(&self) -> Vec<Profile> {
        self.pages
            .iter()
            .flat_map(|p| p.data.iter().cloned())
            .collect()
    }

    /// Drop every loaded page so the next fetch starts from page 1.
    pub fn invalidate(&mut self) {
        self.pages.clear();
    }

    /// Number of loaded pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Check if no page has been loaded.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
