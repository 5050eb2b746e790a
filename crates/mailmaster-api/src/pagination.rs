//! Length-aware pagination envelopes

use mailmaster_common::types::PER_PAGE;
use mailmaster_storage::{Page, PageRequest};
use serde::{Deserialize, Serialize};

/// `?page=` query; missing, malformed or < 1 means page 1
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }

    pub fn request(&self) -> PageRequest {
        PageRequest::for_page(self.page(), PER_PAGE)
    }
}

#[derive(Debug, Serialize)]
pub struct PageLinks {
    pub first: String,
    pub last: String,
    pub prev: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub current_page: i64,
    pub from: Option<i64>,
    pub last_page: i64,
    pub path: String,
    pub per_page: i64,
    pub to: Option<i64>,
    pub total: i64,
}

/// `{data, links, meta}` list response
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub links: PageLinks,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Wrap one page of results; `path` is the absolute URL of the listing
    pub fn new(page: Page<T>, current_page: i64, path: String) -> Self {
        let per_page = PER_PAGE;
        let last_page = ((page.total + per_page - 1) / per_page).max(1);
        let offset = (current_page - 1).saturating_mul(per_page);
        let count = page.items.len() as i64;

        let (from, to) = if count == 0 {
            (None, None)
        } else {
            (Some(offset.saturating_add(1)), Some(offset.saturating_add(count)))
        };

        let url = |n: i64| format!("{}?page={}", path, n);
        let links = PageLinks {
            first: url(1),
            last: url(last_page),
            prev: (current_page > 1).then(|| url(current_page - 1)),
            next: (current_page < last_page).then(|| url(current_page + 1)),
        };

        Self {
            data: page.items,
            links,
            meta: PageMeta {
                current_page,
                from,
                last_page,
                path,
                per_page,
                to,
                total: page.total,
            },
        }
    }
}
