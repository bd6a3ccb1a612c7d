use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One page of results plus the bookkeeping the client needs to render
/// pager controls.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Resolves a requested page number against a known total.
///
/// A missing or unparseable page request lands on the first page; a request
/// past the end lands on the last page. Pages are 1-based, and an empty
/// result set still has one (empty) page.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    pub per_page: i64,
    pub total_items: i64,
}

impl Paginator {
    pub fn new(per_page: i64, total_items: i64) -> Self {
        Self {
            per_page,
            total_items,
        }
    }

    pub fn total_pages(&self) -> i64 {
        ((self.total_items + self.per_page - 1) / self.per_page).max(1)
    }

    /// Clamp the requested page into range.
    pub fn resolve(&self, requested: Option<&str>) -> i64 {
        let page = requested
            .and_then(|p| p.parse::<i64>().ok())
            .unwrap_or(1)
            .max(1);
        page.min(self.total_pages())
    }

    pub fn offset(&self, page: i64) -> i64 {
        (page - 1) * self.per_page
    }

    pub fn page_of<T>(&self, items: Vec<T>, page: i64) -> Page<T> {
        Page {
            items,
            page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages(),
        }
    }
}
