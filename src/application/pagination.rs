//! Offset pagination shared by the admin listings.

use std::num::NonZeroU32;

use thiserror::Error;

pub const FIRST_PAGE: u32 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("invalid page `{0}`")]
    InvalidPage(String),
}

/// A 1-based page number paired with the page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: NonZeroU32) -> Result<Self, PaginationError> {
        if page < FIRST_PAGE {
            return Err(PaginationError::InvalidPage(page.to_string()));
        }
        Ok(Self {
            page,
            per_page: per_page.get(),
        })
    }

    /// Parse the raw `page` query parameter; an absent or blank value means the first page.
    pub fn from_query(raw: Option<&str>, per_page: NonZeroU32) -> Result<Self, PaginationError> {
        let page = match raw.map(str::trim).filter(|value| !value.is_empty()) {
            None => FIRST_PAGE,
            Some(value) => value
                .parse::<u32>()
                .map_err(|_| PaginationError::InvalidPage(value.to_string()))?,
        };
        Self::new(page, per_page)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OffsetPage<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> OffsetPage<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
        }
    }

    /// Highest page number holding records; an empty result still has page 1.
    pub fn last_page(&self) -> u32 {
        if self.total == 0 || self.per_page == 0 {
            return FIRST_PAGE;
        }
        let pages = self.total.div_ceil(u64::from(self.per_page));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn has_pages(&self) -> bool {
        self.last_page() > FIRST_PAGE
    }

    pub fn has_more_pages(&self) -> bool {
        self.page < self.last_page()
    }

    pub fn previous_page(&self) -> Option<u32> {
        (self.page > FIRST_PAGE).then(|| (self.page - 1).min(self.last_page()))
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_more_pages().then(|| self.page + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U, F>(self, f: F) -> OffsetPage<U>
    where
        F: FnMut(T) -> U,
    {
        OffsetPage {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Builds `?page=N` links against a listing's base URL.
#[derive(Debug, Clone)]
pub struct PageLinks {
    base_url: String,
}

impl PageLinks {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, page: u32) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}page={}", self.base_url, separator, page.max(FIRST_PAGE))
    }

    /// Links for every page from 1 through `last_page`, inclusive.
    pub fn range(&self, last_page: u32) -> Vec<(u32, String)> {
        (FIRST_PAGE..=last_page.max(FIRST_PAGE))
            .map(|page| (page, self.url_for(page)))
            .collect()
    }
}
