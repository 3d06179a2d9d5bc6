//! Client-side filter, sort, and pagination over a loaded collection.
//!
//! # Design
//! - Everything here is pure: no I/O, no controller access.
//! - Filtering, sorting, and paging run in that order so page boundaries are
//!   stable for a given query.
//! - Sort keys take an optional `-` prefix for descending order; unknown keys
//!   keep the server order.

use crate::resource::Resource;

/// Rows per page when none is chosen.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Search, filter, sort, and paging inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryState {
    /// Free-text search; blank matches everything.
    pub search: String,
    /// Status filter; blank or `all` matches everything.
    pub status: String,
    /// Sort key, `-` prefixed for descending; blank keeps server order.
    pub sort: String,
    /// 1-based page.
    pub page: usize,
    /// Rows per page, at least 1.
    pub page_size: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: String::new(),
            sort: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Partial update to [`QueryState`]; `None` leaves a field alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryPatch {
    /// New search text.
    pub search: Option<String>,
    /// New status filter.
    pub status: Option<String>,
    /// New sort key.
    pub sort: Option<String>,
    /// New page.
    pub page: Option<usize>,
    /// New page size.
    pub page_size: Option<usize>,
}

impl QueryPatch {
    /// Patch changing only the search text.
    #[must_use]
    pub fn search(value: impl Into<String>) -> Self {
        Self {
            search: Some(value.into()),
            ..Self::default()
        }
    }

    /// Patch changing only the status filter.
    #[must_use]
    pub fn status(value: impl Into<String>) -> Self {
        Self {
            status: Some(value.into()),
            ..Self::default()
        }
    }

    /// Patch changing only the sort key.
    #[must_use]
    pub fn sort(value: impl Into<String>) -> Self {
        Self {
            sort: Some(value.into()),
            ..Self::default()
        }
    }

    /// Patch changing only the page.
    #[must_use]
    pub fn page(value: usize) -> Self {
        Self {
            page: Some(value),
            ..Self::default()
        }
    }
}

/// Apply `patch` to `current`.
///
/// The page resets to 1 whenever search, status, sort, or page size actually
/// change, even if the same patch also sets a page.
#[must_use]
pub fn apply_query_patch(current: &QueryState, patch: QueryPatch) -> QueryState {
    let mut next = current.clone();
    let mut reset = false;

    if let Some(search) = patch.search {
        reset |= search != next.search;
        next.search = search;
    }
    if let Some(status) = patch.status {
        reset |= status != next.status;
        next.status = status;
    }
    if let Some(sort) = patch.sort {
        reset |= sort != next.sort;
        next.sort = sort;
    }
    if let Some(page_size) = patch.page_size {
        let page_size = page_size.max(1);
        reset |= page_size != next.page_size;
        next.page_size = page_size;
    }
    if let Some(page) = patch.page {
        next.page = page;
    }

    next.page = if reset { 1 } else { next.page.max(1) };
    next
}

/// One page of rows plus the totals a pager needs.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedView<R> {
    /// Rows on the current page.
    pub rows: Vec<R>,
    /// Rows matching the filter across all pages.
    pub total_count: usize,
    /// Page count, at least 1.
    pub total_pages: usize,
    /// Page the rows belong to.
    pub page: usize,
}

fn parse_sort(sort: &str) -> Option<(&str, bool)> {
    let sort = sort.trim();
    if sort.is_empty() {
        return None;
    }
    sort.strip_prefix('-')
        .map_or(Some((sort, false)), |key| Some((key, true)))
}

fn status_filter(status: &str) -> Option<&str> {
    let status = status.trim();
    if status.is_empty() || status.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(status)
    }
}

/// Filter, sort, and slice `collection` according to `query`.
#[must_use]
pub fn derived_view<R: Resource>(collection: &[R], query: &QueryState) -> DerivedView<R> {
    let needle = query.search.trim().to_lowercase();
    let status = status_filter(&query.status);

    let mut matching: Vec<&R> = collection
        .iter()
        .filter(|record| needle.is_empty() || record.matches_search(&needle))
        .filter(|record| status.is_none_or(|status| record.matches_status(status)))
        .collect();

    if let Some((key, descending)) = parse_sort(&query.sort)
        && R::sort_keys().contains(&key)
    {
        matching.sort_by(|left, right| {
            let ordering = left
                .compare(right, key)
                .unwrap_or(std::cmp::Ordering::Equal);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    let page_size = query.page_size.max(1);
    let page = query.page.max(1);
    let total_count = matching.len();
    let total_pages = total_count.div_ceil(page_size).max(1);
    let rows = matching
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .cloned()
        .collect();

    DerivedView {
        rows,
        total_count,
        total_pages,
        page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storedesk_models::{AccountStatus, Admin};

    fn admin(id: &str, name: &str, status: AccountStatus) -> Admin {
        Admin {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@store.test", name.to_lowercase()),
            role: "admin".to_string(),
            status,
            phone: None,
            created_at: None,
            last_login_at: None,
        }
    }

    fn five_admins() -> Vec<Admin> {
        vec![
            admin("1", "Ada", AccountStatus::Active),
            admin("2", "Grace", AccountStatus::Active),
            admin("3", "Linus", AccountStatus::Disabled),
            admin("4", "Barbara", AccountStatus::Active),
            admin("5", "Edsger", AccountStatus::Disabled),
        ]
    }

    fn ids(rows: &[Admin]) -> Vec<&str> {
        rows.iter().map(|row| row.id.as_str()).collect()
    }

    #[test]
    fn status_filter_keeps_only_matching_rows_and_resets_page() {
        let collection = five_admins();
        let paged = apply_query_patch(&QueryState::default(), QueryPatch::page(2));
        let query = apply_query_patch(&paged, QueryPatch::status("active"));
        assert_eq!(query.page, 1);

        let view = derived_view(&collection, &query);
        assert_eq!(ids(&view.rows), vec!["1", "2", "4"]);
        assert_eq!(view.total_count, 3);
    }

    #[test]
    fn page_resets_even_when_patch_also_sets_page() {
        let query = apply_query_patch(
            &QueryState::default(),
            QueryPatch {
                search: Some("ada".into()),
                page: Some(4),
                ..QueryPatch::default()
            },
        );
        assert_eq!(query.page, 1);
    }

    #[test]
    fn unchanged_values_do_not_reset_page() {
        let start = apply_query_patch(&QueryState::default(), QueryPatch::page(3));
        let next = apply_query_patch(&start, QueryPatch::search(""));
        assert_eq!(next.page, 3);
    }

    #[test]
    fn page_and_size_are_clamped() {
        let query = apply_query_patch(
            &QueryState::default(),
            QueryPatch {
                page_size: Some(0),
                ..QueryPatch::default()
            },
        );
        assert_eq!(query.page_size, 1);
        let query = apply_query_patch(&query, QueryPatch::page(0));
        assert_eq!(query.page, 1);
    }

    #[test]
    fn search_is_case_insensitive_and_all_disables_status() {
        let collection = five_admins();
        let query = QueryState {
            search: "  GRA ".into(),
            status: "All".into(),
            ..QueryState::default()
        };
        assert_eq!(ids(&derived_view(&collection, &query).rows), vec!["2"]);
    }

    #[test]
    fn sorts_descending_and_ignores_unknown_keys() {
        let collection = five_admins();
        let query = QueryState {
            sort: "-name".into(),
            ..QueryState::default()
        };
        assert_eq!(
            ids(&derived_view(&collection, &query).rows),
            vec!["3", "2", "5", "4", "1"]
        );

        let unknown = QueryState {
            sort: "shoe_size".into(),
            ..QueryState::default()
        };
        assert_eq!(
            ids(&derived_view(&collection, &unknown).rows),
            vec!["1", "2", "3", "4", "5"]
        );
    }

    #[test]
    fn pages_cover_filtered_set_exactly_once() {
        let collection: Vec<Admin> = (0..23)
            .map(|index| {
                let status = if index % 3 == 0 {
                    AccountStatus::Disabled
                } else {
                    AccountStatus::Active
                };
                admin(&format!("id-{index:02}"), &format!("User{index:02}"), status)
            })
            .collect();

        for page_size in 1..=9 {
            let base = QueryState {
                status: "active".into(),
                sort: "-name".into(),
                page_size,
                ..QueryState::default()
            };
            let all = derived_view(&collection, &QueryState { page_size: 100, ..base.clone() });
            let first = derived_view(&collection, &base);

            let mut seen = Vec::new();
            for page in 1..=first.total_pages {
                let view = derived_view(&collection, &QueryState { page, ..base.clone() });
                assert!(view.rows.len() <= page_size);
                seen.extend(view.rows);
            }
            assert_eq!(seen, all.rows);
            assert_eq!(seen.len(), first.total_count);
        }
    }

    #[test]
    fn view_is_deterministic() {
        let collection = five_admins();
        let query = QueryState {
            search: "a".into(),
            sort: "name".into(),
            page_size: 2,
            ..QueryState::default()
        };
        assert_eq!(derived_view(&collection, &query), derived_view(&collection, &query));
    }

    #[test]
    fn page_past_end_is_empty_but_totals_hold() {
        let collection = five_admins();
        let query = QueryState {
            page: 9,
            page_size: 2,
            ..QueryState::default()
        };
        let view = derived_view(&collection, &query);
        assert!(view.rows.is_empty());
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.total_count, 5);

        let empty = derived_view::<Admin>(&[], &QueryState::default());
        assert_eq!(empty.total_pages, 1);
    }
}
