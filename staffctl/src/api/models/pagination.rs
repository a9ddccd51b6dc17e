//! Shared paging types for list endpoints.
//!
//! List endpoints take `page`, `page_size` and `sort` query parameters. Unlike a clamp,
//! out-of-range values are rejected as a failed validation so clients learn about them.

use crate::db::filters::{Filters, Metadata, Page};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use utoipa::{IntoParams, ToSchema};

/// Standard paging parameters for list endpoints.
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
pub struct PageParams {
    /// Page number, starting at 1 (default: 1)
    #[param(default = 1, minimum = 1)]
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub page: Option<i64>,

    /// Rows per page (default: 20, max: 100)
    #[param(default = 20, minimum = 1, maximum = 100)]
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub page_size: Option<i64>,

    /// Sort key; prefix with `-` for descending order
    pub sort: Option<String>,
}

impl PageParams {
    /// Overlay the requested values onto an entity's default filters.
    pub fn apply(&self, mut filters: Filters) -> Filters {
        if let Some(page) = self.page {
            filters.page = page;
        }
        if let Some(page_size) = self.page_size {
            filters.page_size = page_size;
        }
        if let Some(sort) = &self.sort {
            filters.sort = sort.clone();
        }
        filters
    }
}

/// Split a comma-separated tag list, dropping empty segments.
pub fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Result-set metadata. All zero when nothing matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageMetadata {
    pub current_page: i64,
    pub page_size: i64,
    pub first_page: i64,
    pub last_page: i64,
    pub total_records: i64,
}

impl From<Metadata> for PageMetadata {
    fn from(m: Metadata) -> Self {
        Self {
            current_page: m.current_page,
            page_size: m.page_size,
            first_page: m.first_page,
            last_page: m.last_page,
            total_records: m.total_records,
        }
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T: ToSchema> {
    /// The items for the current page
    pub data: Vec<T>,
    /// Paging metadata computed from the same query as `data`
    pub metadata: PageMetadata,
}

impl<T: ToSchema> PaginatedResponse<T> {
    pub fn from_page<U>(page: Page<U>) -> Self
    where
        T: From<U>,
    {
        let page = page.map(T::from);
        Self {
            data: page.items,
            metadata: page.metadata.into(),
        }
    }
}
