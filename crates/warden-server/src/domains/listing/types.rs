use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: &'static str,
}

/// Raw listing parameters. Values stay strings so malformed numbers surface
/// as pagination errors instead of extractor rejections.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    pub(crate) page: Option<String>,
    #[serde(default)]
    pub(crate) size: Option<String>,
    #[serde(default, rename = "sortBy")]
    pub(crate) sort_by: Option<String>,
    #[serde(default, rename = "sortOrder")]
    pub(crate) sort_order: Option<String>,
}

impl ListQuery {
    pub(crate) fn is_paginated(&self) -> bool {
        self.page.is_some() || self.size.is_some()
    }
}
