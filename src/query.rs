//! List query state and its mapping onto list-endpoint parameters.
//!
//! All transitions are pure: each setter returns whether the resulting state
//! differs, which is what the controller uses to decide whether a fetch is
//! owed. Every setter except [`QueryState::set_page`] resets the page to 1.

use std::collections::BTreeMap;

use crate::entity::{EntityStatus, StatusCasing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(EntityStatus),
}

impl StatusFilter {
    pub fn active() -> Self {
        Self::Only(EntityStatus::Active)
    }

    pub fn inactive() -> Self {
        Self::Only(EntityStatus::Inactive)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    pub status_filter: StatusFilter,
    pub sort_key: Option<String>,
    pub sort_dir: Option<SortDir>,
    /// Extra scoped filters passed through verbatim, e.g. `categoryId`.
    pub filters: BTreeMap<String, String>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::with_page_size(10)
    }
}

impl QueryState {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            search: String::new(),
            status_filter: StatusFilter::All,
            sort_key: None,
            sort_dir: None,
            filters: BTreeMap::new(),
        }
    }

    pub fn set_search(&mut self, text: &str) -> bool {
        let before = self.clone();
        self.search = text.to_string();
        self.page = 1;
        *self != before
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) -> bool {
        let before = self.clone();
        self.status_filter = filter;
        self.page = 1;
        *self != before
    }

    /// A size of zero is treated as one.
    pub fn set_page_size(&mut self, size: u32) -> bool {
        let before = self.clone();
        self.page_size = size.max(1);
        self.page = 1;
        *self != before
    }

    /// Move to `page`, clamped into `[1, max_page]` when the page count is
    /// known.
    pub fn set_page(&mut self, page: u32, max_page: Option<u32>) -> bool {
        let upper = max_page.map(|m| m.max(1)).unwrap_or(u32::MAX);
        let target = page.clamp(1, upper);
        let changed = target != self.page;
        self.page = target;
        changed
    }

    /// Same key toggles direction; a new key starts ascending.
    pub fn set_sort(&mut self, key: &str) -> bool {
        let before = self.clone();
        if self.sort_key.as_deref() == Some(key) {
            self.sort_dir = Some(self.sort_dir.unwrap_or(SortDir::Asc).flipped());
        } else {
            self.sort_key = Some(key.to_string());
            self.sort_dir = Some(SortDir::Asc);
        }
        self.page = 1;
        *self != before
    }

    pub fn set_filter(&mut self, key: &str, value: &str) -> bool {
        let before = self.clone();
        self.filters.insert(key.to_string(), value.to_string());
        self.page = 1;
        *self != before
    }

    pub fn clear_filter(&mut self, key: &str) -> bool {
        let before = self.clone();
        self.filters.remove(key);
        self.page = 1;
        *self != before
    }

    /// Query-string pairs for `GET /<collection>`. The server's page index is
    /// 0-based; blank search and the `All` filter are omitted.
    pub fn to_params(&self, casing: StatusCasing) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.saturating_sub(1).to_string()),
            ("size".to_string(), self.page_size.to_string()),
        ];
        let search = self.search.trim();
        if !search.is_empty() {
            params.push(("search".to_string(), search.to_string()));
        }
        if let StatusFilter::Only(status) = self.status_filter {
            params.push(("status".to_string(), casing.encode(status)));
        }
        if let Some(key) = self.sort_key.as_deref() {
            params.push(("sortBy".to_string(), key.to_string()));
            let dir = self.sort_dir.unwrap_or(SortDir::Asc);
            params.push(("sortDir".to_string(), dir.as_str().to_string()));
        }
        for (key, value) in &self.filters {
            params.push((key.clone(), value.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn sort_toggles_on_repeat_and_resets_on_new_key() {
        let mut q = QueryState::default();
        assert!(q.set_sort("name"));
        assert_eq!(q.sort_key.as_deref(), Some("name"));
        assert_eq!(q.sort_dir, Some(SortDir::Asc));

        assert!(q.set_sort("name"));
        assert_eq!(q.sort_dir, Some(SortDir::Desc));

        assert!(q.set_sort("createdAt"));
        assert_eq!(q.sort_key.as_deref(), Some("createdAt"));
        assert_eq!(q.sort_dir, Some(SortDir::Asc));
    }

    #[test]
    fn setters_reset_page_except_set_page() {
        let mut q = QueryState::default();
        q.set_page(3, None);
        q.set_search("acme");
        assert_eq!(q.page, 1);

        q.set_page(2, None);
        q.set_status_filter(StatusFilter::inactive());
        assert_eq!(q.page, 1);

        q.set_page(4, None);
        q.set_page_size(25);
        assert_eq!(q.page, 1);

        q.set_page(2, None);
        assert_eq!(q.page, 2);
    }

    #[test]
    fn unchanged_setter_reports_no_change() {
        let mut q = QueryState::default();
        assert!(!q.set_search(""));
        assert!(!q.set_status_filter(StatusFilter::All));
        assert!(!q.set_page_size(10));
        assert!(!q.set_page(1, Some(3)));
    }

    #[test]
    fn filter_change_on_later_page_is_one_change() {
        let mut q = QueryState::default();
        q.set_page(3, None);
        let before = q.clone();
        assert!(q.set_search("x"));
        assert_ne!(q, before);
        assert_eq!(q.page, 1);
    }

    #[test]
    fn set_page_clamps_to_known_page_count() {
        let mut q = QueryState::default();
        q.set_page(3, Some(3));
        assert!(!q.set_page(4, Some(3)));
        assert_eq!(q.page, 3);

        q.set_page(0, Some(3));
        assert_eq!(q.page, 1);

        q.set_page(5, Some(0));
        assert_eq!(q.page, 1);
    }

    #[test]
    fn params_use_zero_based_page_and_endpoint_casing() {
        let mut q = QueryState::with_page_size(20);
        q.set_search("  acme ");
        q.set_status_filter(StatusFilter::active());
        q.set_sort("name");
        q.set_page(2, None);

        let upper = q.to_params(StatusCasing::Upper);
        assert_eq!(param(&upper, "page"), Some("1"));
        assert_eq!(param(&upper, "size"), Some("20"));
        assert_eq!(param(&upper, "search"), Some("acme"));
        assert_eq!(param(&upper, "status"), Some("ACTIVE"));
        assert_eq!(param(&upper, "sortBy"), Some("name"));
        assert_eq!(param(&upper, "sortDir"), Some("asc"));

        let lower = q.to_params(StatusCasing::Lower);
        assert_eq!(param(&lower, "status"), Some("active"));
    }

    #[test]
    fn params_omit_blank_search_all_status_and_missing_sort() {
        let mut q = QueryState::default();
        q.set_filter("categoryId", "7");
        let params = q.to_params(StatusCasing::Lower);
        assert!(param(&params, "search").is_none());
        assert!(param(&params, "status").is_none());
        assert!(param(&params, "sortBy").is_none());
        assert_eq!(param(&params, "categoryId"), Some("7"));
    }
}
