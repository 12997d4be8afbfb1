//! Query strings accepted by list endpoints.

use serde::Deserialize;

/// `?limit=&offset=` for donation, comment and admin lists.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?search=&category=&page=&page_size=` for the public project list.
/// Pages are 1-based.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
