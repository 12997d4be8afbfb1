//! Success envelopes. Bodies are always `{"data": ...}`; list endpoints
//! that report totals put a [`Page`] inside.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// A 1-based page of results with the unpaged row count.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub items: Vec<T>,
}
