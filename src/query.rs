// src/query.rs - List query parameters shared by users, products and carts

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// `limit`, `skip`, `select`, `sortBy` and `order` for list endpoints.
///
/// `limit(0)` asks for every record. `skip` is signed so out-of-range values
/// can be sent on purpose.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    limit: Option<u64>,
    skip: Option<i64>,
    select: Vec<String>,
    sort_by: Option<String>,
    order: Option<SortOrder>,
    extra: Vec<(String, String)>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: i64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.order = Some(order);
        self
    }

    /// Any other parameter, e.g. `q` for search endpoints.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(skip) = self.skip {
            pairs.push(("skip".to_string(), skip.to_string()));
        }
        if !self.select.is_empty() {
            pairs.push(("select".to_string(), self.select.join(",")));
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sortBy".to_string(), sort_by.clone()));
        }
        if let Some(order) = self.order {
            pairs.push(("order".to_string(), order.to_string()));
        }
        pairs.extend(self.extra.iter().cloned());
        pairs
    }
}
