//! Paging, sorting and result-set metadata for list queries.
//!
//! [`Filters`] carries the client's requested page, page size and sort key together
//! with the safelist of sort keys the caller may request. [`validate_filters`] is the
//! injection boundary: only a key that is a literal member of the safelist is ever
//! interpolated into SQL text (see [`Filters::push_order_by`]); every filter value
//! travels as a bound parameter.
//!
//! A key prefixed with [`DESCENDING_MARKER`] sorts descending on the unprefixed column.
//!
//! List queries select `count(*) OVER()` alongside the page rows, so the total used for
//! [`Metadata`] always comes from the same execution as the rows themselves.

use crate::db::errors::Result;
use crate::validation::{Validator, permitted_value};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Postgres, QueryBuilder, Row};

/// Default page when the client does not ask for one.
pub const DEFAULT_PAGE: i64 = 1;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest page size a client may request. Larger values fail validation.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Largest page number a client may request.
pub const MAX_PAGE: i64 = 10_000_000;

/// Prefix on a sort key requesting descending order.
pub const DESCENDING_MARKER: char = '-';

/// Name of the windowed total-count column selected by list queries.
pub const TOTAL_RECORDS_COLUMN: &str = "total_records";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Requested page, page size and sort key for a list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub page: i64,
    pub page_size: i64,
    pub sort: String,
    pub sort_safelist: &'static [&'static str],
}

impl Filters {
    /// Filters with default paging, sorted ascending on `default_sort`.
    pub fn new(default_sort: &str, sort_safelist: &'static [&'static str]) -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort: default_sort.to_string(),
            sort_safelist,
        }
    }

    pub fn with_page(mut self, page: i64, page_size: i64) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    /// The literal column named by the sort key, without the descending marker.
    ///
    /// # Panics
    ///
    /// Panics if the sort key is not in the safelist. [`validate_filters`] must have
    /// rejected such filters before a query is built from them.
    pub fn sort_column(&self) -> &str {
        let safe = self
            .sort_safelist
            .iter()
            .find(|key| **key == self.sort)
            .copied()
            .unwrap_or_else(|| panic!("unsafe sort parameter: {}", self.sort));

        safe.strip_prefix(DESCENDING_MARKER).unwrap_or(safe)
    }

    pub fn sort_direction(&self) -> SortDirection {
        if self.sort.starts_with(DESCENDING_MARKER) {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// Append `ORDER BY <alias>.<column> <dir>, <alias>.id ASC LIMIT $n OFFSET $m`.
    ///
    /// The `id` tiebreaker keeps ordering stable across pages when the sort column
    /// holds duplicate values.
    pub fn push_order_by(&self, query: &mut QueryBuilder<'_, Postgres>, alias: &str) {
        query.push(format!(
            " ORDER BY {alias}.{} {}, {alias}.id ASC",
            self.sort_column(),
            self.sort_direction().as_sql()
        ));
        query.push(" LIMIT ");
        query.push_bind(self.limit());
        query.push(" OFFSET ");
        query.push_bind(self.offset());
    }
}

pub fn validate_filters(v: &mut Validator, f: &Filters) {
    v.check(f.page > 0, "page", "must be greater than zero");
    v.check(f.page <= MAX_PAGE, "page", "must be a maximum of 10 million");
    v.check(f.page_size > 0, "page_size", "must be greater than zero");
    v.check(f.page_size <= MAX_PAGE_SIZE, "page_size", "must be a maximum of 100");
    v.check(permitted_value(f.sort.as_str(), f.sort_safelist), "sort", "invalid sort value");
}

/// Result-set metadata derived from a windowed total count.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub current_page: i64,
    pub page_size: i64,
    pub first_page: i64,
    pub last_page: i64,
    pub total_records: i64,
}

pub fn calculate_metadata(total_records: i64, page: i64, page_size: i64) -> Metadata {
    if total_records == 0 {
        return Metadata::default();
    }

    Metadata {
        current_page: page,
        page_size,
        first_page: 1,
        last_page: (total_records + page_size - 1) / page_size,
        total_records,
    }
}

/// One page of a list query.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub metadata: Metadata,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            metadata: self.metadata,
        }
    }
}

/// Decode rows carrying a [`TOTAL_RECORDS_COLUMN`] window column into a page.
///
/// An empty result (including a page past the end) yields empty metadata.
pub(crate) fn collect_page<T>(rows: Vec<PgRow>, filters: &Filters) -> Result<Page<T>>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    let mut total_records = 0;
    let mut items = Vec::with_capacity(rows.len());

    for row in &rows {
        total_records = row.try_get::<i64, _>(TOTAL_RECORDS_COLUMN)?;
        items.push(T::from_row(row)?);
    }

    Ok(Page {
        items,
        metadata: calculate_metadata(total_records, filters.page, filters.page_size),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAFELIST: &[&str] = &["id", "first_name", "last_name", "-id", "-first_name", "-last_name"];

    fn filters(sort: &str) -> Filters {
        Filters::new("id", SAFELIST).with_sort(sort)
    }

    fn is_valid(f: &Filters) -> bool {
        let mut v = Validator::new();
        validate_filters(&mut v, f);
        v.valid()
    }

    #[test]
    fn test_limit_and_offset() {
        for page in [1, 2, 7, 500] {
            for page_size in [1, 20, 99, 100] {
                let f = filters("id").with_page(page, page_size);
                assert_eq!(f.limit(), page_size);
                assert_eq!(f.offset(), (page - 1) * page_size);
            }
        }
    }

    #[test]
    fn test_page_bounds_are_validated_not_clamped() {
        assert!(is_valid(&filters("id").with_page(1, 1)));
        assert!(is_valid(&filters("id").with_page(1, 100)));
        assert!(!is_valid(&filters("id").with_page(0, 20)));
        assert!(!is_valid(&filters("id").with_page(-1, 20)));
        assert!(!is_valid(&filters("id").with_page(1, 0)));
        assert!(!is_valid(&filters("id").with_page(1, 101)));
        assert!(!is_valid(&filters("id").with_page(MAX_PAGE + 1, 20)));

        let mut v = Validator::new();
        validate_filters(&mut v, &filters("id").with_page(1, 101));
        assert_eq!(v.errors()["page_size"], "must be a maximum of 100");
    }

    #[test]
    fn test_sort_key_must_be_exact_safelist_member() {
        for key in SAFELIST {
            assert!(is_valid(&filters(key)), "{key} should be accepted");
        }

        for key in ["", "ID", "first", "first_name ", "--id", "id; DROP TABLE resources", "position_id", "+id"] {
            let mut v = Validator::new();
            validate_filters(&mut v, &filters(key));
            assert_eq!(v.errors().get("sort").map(String::as_str), Some("invalid sort value"), "{key:?}");
        }
    }

    #[test]
    fn test_sort_column_strips_one_marker() {
        assert_eq!(filters("id").sort_column(), "id");
        assert_eq!(filters("-id").sort_column(), "id");
        assert_eq!(filters("-last_name").sort_column(), "last_name");
    }

    #[test]
    fn test_sort_direction() {
        assert_eq!(filters("first_name").sort_direction(), SortDirection::Asc);
        assert_eq!(filters("-first_name").sort_direction(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.as_sql(), "DESC");
    }

    #[test]
    #[should_panic(expected = "unsafe sort parameter")]
    fn test_sort_column_panics_outside_safelist() {
        filters("password").sort_column();
    }

    #[test]
    fn test_order_by_sql() {
        let f = filters("-last_name").with_page(3, 10);
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM resources r WHERE 1=1");
        f.push_order_by(&mut query, "r");
        assert_eq!(
            query.sql(),
            "SELECT * FROM resources r WHERE 1=1 ORDER BY r.last_name DESC, r.id ASC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_metadata_empty_for_zero_records() {
        for (page, page_size) in [(1, 20), (4, 1), (99, 100)] {
            assert_eq!(calculate_metadata(0, page, page_size), Metadata::default());
        }
    }

    #[test]
    fn test_metadata_last_page() {
        let m = calculate_metadata(53, 1, 20);
        assert_eq!(m.last_page, 3);
        assert_eq!(m.first_page, 1);
        assert_eq!(m.current_page, 1);
        assert_eq!(m.page_size, 20);
        assert_eq!(m.total_records, 53);

        assert_eq!(calculate_metadata(60, 2, 20).last_page, 3);
        assert_eq!(calculate_metadata(1, 1, 100).last_page, 1);
        assert_eq!(calculate_metadata(101, 1, 100).last_page, 2);
    }
}
