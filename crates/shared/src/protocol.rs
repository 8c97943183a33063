use serde::{Deserialize, Serialize};

pub const TALKS_ROUTE: &str = "/api/talks";
pub const SEARCH_ROUTE: &str = "/api/search";
pub const SPEAKERS_ROUTE: &str = "/api/speakers";
pub const CONFERENCE_ROUTE: &str = "/api/conference";
pub const HEALTH_ROUTE: &str = "/healthz";

/// Filter criteria for `GET /api/search`.
///
/// Both fields are optional on the wire; empty values are never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl SearchQuery {
    /// Builds criteria from raw input values. The text query is trimmed;
    /// returns `None` when neither field carries a value.
    pub fn from_inputs(query: &str, category: &str) -> Option<Self> {
        let criteria = Self {
            q: non_empty(query.trim()),
            category: non_empty(category),
        }
        .normalized();
        (!criteria.is_empty()).then_some(criteria)
    }

    /// Drops empty or whitespace-only fields.
    pub fn normalized(self) -> Self {
        Self {
            q: self.q.and_then(|q| non_empty(q.trim())),
            category: self.category.and_then(|c| non_empty(c.trim())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_none() && self.category.is_none()
    }

    /// Query pairs in wire order: `q` first, then `category`.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(q) = &self.q {
            pairs.push(("q", q.as_str()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.as_str()));
        }
        pairs
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
