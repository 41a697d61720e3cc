//! Page windowing for changelist results.
//!
//! [`Paginator`] slices an already-materialized result set into pages. It
//! only ever changes the window parameters (`per_page`, `orphans`,
//! `allow_empty_first_page`); the underlying collection is never mutated.
//! The export path reuses this type with a widened window so the whole
//! practical result set lands on page one.

use std::fmt;
use std::ops::RangeInclusive;

/// Errors that can occur when requesting a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    /// The requested page has no items.
    EmptyPage,
    /// The page number is invalid (zero).
    InvalidPage(String),
}

impl fmt::Display for PaginationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPage => write!(f, "That page contains no results"),
            Self::InvalidPage(msg) => write!(f, "Invalid page: {msg}"),
        }
    }
}

impl std::error::Error for PaginationError {}

/// Splits a collection of objects into pages.
pub struct Paginator<T> {
    object_list: Vec<T>,
    per_page: usize,
    orphans: usize,
    allow_empty_first_page: bool,
}

impl<T: Clone> Paginator<T> {
    /// Creates a paginator with the given objects and page size.
    ///
    /// Orphans default to 0 and an empty first page is allowed.
    pub fn new(object_list: Vec<T>, per_page: usize) -> Self {
        Self {
            object_list,
            per_page: per_page.max(1),
            orphans: 0,
            allow_empty_first_page: true,
        }
    }

    /// Sets the orphan count: when the last page would hold this many
    /// items or fewer, they are folded into the previous page.
    #[must_use]
    pub fn orphans(mut self, orphans: usize) -> Self {
        self.orphans = orphans;
        self
    }

    /// Sets whether an empty result set still yields a first page.
    #[must_use]
    pub fn allow_empty_first_page(mut self, allow: bool) -> Self {
        self.allow_empty_first_page = allow;
        self
    }

    /// Returns the total number of objects across all pages.
    pub fn count(&self) -> usize {
        self.object_list.len()
    }

    /// Returns the total number of pages.
    pub fn num_pages(&self) -> usize {
        let count = self.count();
        if count == 0 {
            return usize::from(self.allow_empty_first_page);
        }
        let hits = if count > self.orphans {
            count - self.orphans
        } else {
            1
        };
        hits.div_ceil(self.per_page)
    }

    /// Returns the range of valid page numbers (1-indexed, inclusive).
    pub fn page_range(&self) -> RangeInclusive<usize> {
        1..=self.num_pages()
    }

    /// Returns the requested page (1-indexed).
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidPage`] for page 0 and
    /// [`PaginationError::EmptyPage`] for pages beyond the last.
    pub fn page(&self, number: usize) -> Result<Page<T>, PaginationError> {
        if number == 0 {
            return Err(PaginationError::InvalidPage(
                "Page number must be >= 1".to_string(),
            ));
        }
        let num_pages = self.num_pages();
        if number > num_pages {
            return Err(PaginationError::EmptyPage);
        }

        let start = (number - 1) * self.per_page;
        let end = if number == num_pages {
            // The last page absorbs the orphans.
            self.count()
        } else {
            (start + self.per_page).min(self.count())
        };

        Ok(Page {
            object_list: self.object_list[start..end].to_vec(),
            number,
            num_pages,
        })
    }

    /// Returns the requested page, clamping out-of-range numbers instead
    /// of failing.
    pub fn get_page(&self, number: usize) -> Page<T> {
        let num_pages = self.num_pages();
        let target = number.clamp(1, num_pages.max(1));
        self.page(target).unwrap_or(Page {
            object_list: Vec::new(),
            number: target,
            num_pages,
        })
    }
}

impl<T> fmt::Debug for Paginator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("count", &self.object_list.len())
            .field("per_page", &self.per_page)
            .field("orphans", &self.orphans)
            .field("allow_empty_first_page", &self.allow_empty_first_page)
            .finish()
    }
}

/// One page of results produced by a [`Paginator`].
#[derive(Debug, Clone)]
pub struct Page<T> {
    object_list: Vec<T>,
    number: usize,
    num_pages: usize,
}

impl<T> Page<T> {
    /// Returns the objects on this page.
    pub fn object_list(&self) -> &[T] {
        &self.object_list
    }

    /// Consumes the page, returning its objects.
    pub fn into_object_list(self) -> Vec<T> {
        self.object_list
    }

    /// Returns this page's 1-indexed number.
    pub const fn number(&self) -> usize {
        self.number
    }

    /// Returns the total number of pages.
    pub const fn num_pages(&self) -> usize {
        self.num_pages
    }

    /// Returns whether a later page exists.
    pub const fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// Returns whether an earlier page exists.
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginator_basic() {
        let items: Vec<i32> = (1..=100).collect();
        let paginator = Paginator::new(items, 10);
        assert_eq!(paginator.count(), 100);
        assert_eq!(paginator.num_pages(), 10);
        assert_eq!(paginator.page_range(), 1..=10);

        let page = paginator.page(1).unwrap();
        assert_eq!(page.object_list().len(), 10);
        assert_eq!(page.number(), 1);
        assert!(page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_paginator_last_page_partial() {
        let items: Vec<i32> = (1..=25).collect();
        let paginator = Paginator::new(items, 10);
        assert_eq!(paginator.num_pages(), 3);

        let page = paginator.page(3).unwrap();
        assert_eq!(page.object_list(), &[21, 22, 23, 24, 25]);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_paginator_orphans_fold_into_previous_page() {
        // 22 items, 10 per page, 3 orphans: the 2 trailing items join page 2.
        let items: Vec<i32> = (1..=22).collect();
        let paginator = Paginator::new(items, 10).orphans(3);
        assert_eq!(paginator.num_pages(), 2);

        let last = paginator.page(2).unwrap();
        assert_eq!(last.object_list().len(), 12);
    }

    #[test]
    fn test_paginator_empty_first_page_allowed() {
        let paginator: Paginator<i32> = Paginator::new(Vec::new(), 10);
        assert_eq!(paginator.num_pages(), 1);
        let page = paginator.page(1).unwrap();
        assert!(page.object_list().is_empty());
        assert!(!page.has_next());
    }

    #[test]
    fn test_paginator_empty_first_page_disallowed() {
        let paginator: Paginator<i32> =
            Paginator::new(Vec::new(), 10).allow_empty_first_page(false);
        assert_eq!(paginator.num_pages(), 0);
        assert_eq!(paginator.page(1).unwrap_err(), PaginationError::EmptyPage);
    }

    #[test]
    fn test_paginator_page_zero() {
        let paginator = Paginator::new(vec![1, 2, 3], 10);
        assert!(matches!(
            paginator.page(0),
            Err(PaginationError::InvalidPage(_))
        ));
    }

    #[test]
    fn test_paginator_page_beyond_range() {
        let paginator = Paginator::new(vec![1, 2, 3], 10);
        assert_eq!(paginator.page(2).unwrap_err(), PaginationError::EmptyPage);
    }

    #[test]
    fn test_get_page_clamps() {
        let items: Vec<i32> = (1..=25).collect();
        let paginator = Paginator::new(items, 10);

        assert_eq!(paginator.get_page(0).number(), 1);
        assert_eq!(paginator.get_page(99).number(), 3);
        assert_eq!(paginator.get_page(99).object_list().len(), 5);
    }

    #[test]
    fn test_per_page_zero_treated_as_one() {
        let paginator = Paginator::new(vec![1, 2], 0);
        assert_eq!(paginator.num_pages(), 2);
    }

    #[test]
    fn test_page_eq_for_error() {
        // PaginationError supports direct comparison in assertions.
        assert_eq!(PaginationError::EmptyPage, PaginationError::EmptyPage);
        assert_ne!(
            PaginationError::EmptyPage,
            PaginationError::InvalidPage("x".to_string())
        );
    }

    #[test]
    fn test_widened_window_holds_everything() {
        // The export path raises per_page so the entire set fits on page 1.
        let items: Vec<i32> = (1..=5_000).collect();
        let paginator = Paginator::new(items, 10_000).orphans(0);
        assert_eq!(paginator.num_pages(), 1);
        assert_eq!(paginator.page(1).unwrap().object_list().len(), 5_000);
    }

    #[test]
    fn test_widened_window_truncates_at_ceiling() {
        let items: Vec<i32> = (1..=12_000).collect();
        let paginator = Paginator::new(items, 10_000);
        assert_eq!(paginator.num_pages(), 2);
        // Page one carries exactly the ceiling; the tail is never rendered.
        assert_eq!(paginator.page(1).unwrap().object_list().len(), 10_000);
    }
}
