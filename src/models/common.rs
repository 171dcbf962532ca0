//! Shared wire types for paginated list endpoints and the generic
//! `/common/*` operations (status toggle, delete, drag-reorder).

use serde::{Deserialize, Serialize};

/// Pagination block echoed by every list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default, rename = "totalPages")]
    pub total_pages: u32,
}

/// Query parameters accepted by list endpoints: free-text search,
/// pagination, and single-column sort.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub search: String,
    pub page: u32,
    pub limit: u32,
    pub sort_by: String,
    pub sort_order: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
            limit: 10,
            sort_by: String::new(),
            sort_order: String::new(),
        }
    }
}

impl ListQuery {
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn sort(mut self, by: impl Into<String>, order: impl Into<String>) -> Self {
        self.sort_by = by.into();
        self.sort_order = order.into();
        self
    }

    /// Key/value pairs for the request query string.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("search", self.search.clone()),
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("sortBy", self.sort_by.clone()),
            ("sortOrder", self.sort_order.clone()),
        ]
    }
}

/// `PUT /common/status` payload: toggle one record's status in a module
/// ("user", "role", "faq", "cms", "customer").
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub module: String,
    pub id: i64,
    pub status: String,
}

/// `DELETE /common/delete` payload.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteRequest {
    pub module: String,
    pub id: i64,
}

/// `PUT /common/sequence` payload: absolute sequence numbers for the
/// reordered page (offset by `(page - 1) * limit` so drag-reorder on
/// page two does not renumber page one).
#[derive(Debug, Clone, Serialize)]
pub struct SequenceUpdate {
    pub module: String,
    pub sequences: Vec<SequenceEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SequenceEntry {
    pub id: i64,
    pub sequence: u32,
}

impl SequenceUpdate {
    /// Build the payload from the visible row order of one page.
    pub fn from_page_order(module: &str, ids: &[i64], page: u32, limit: u32) -> Self {
        let offset = page.saturating_sub(1) * limit;
        Self {
            module: module.to_string(),
            sequences: ids
                .iter()
                .enumerate()
                .map(|(index, &id)| SequenceEntry {
                    id,
                    sequence: offset + index as u32 + 1,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let query = ListQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);

        let params = query.params();
        assert!(params.contains(&("page", "1".to_string())));
        assert!(params.contains(&("limit", "10".to_string())));
    }

    #[test]
    fn test_sequence_offsets_by_page() {
        let update = SequenceUpdate::from_page_order("faq", &[31, 12, 44], 2, 10);
        assert_eq!(update.module, "faq");
        let sequences: Vec<(i64, u32)> =
            update.sequences.iter().map(|e| (e.id, e.sequence)).collect();
        assert_eq!(sequences, vec![(31, 11), (12, 12), (44, 13)]);
    }

    #[test]
    fn test_pagination_parses_wire_names() {
        let pagination: Pagination =
            serde_json::from_str(r#"{"page":3,"limit":10,"total":42,"totalPages":5}"#)
                .expect("parse pagination");
        assert_eq!(pagination.total_pages, 5);
        assert_eq!(pagination.total, 42);
    }
}
