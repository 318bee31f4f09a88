//! Provider request and response bodies.

use serde::{Deserialize, Serialize};

use canopy_core::models::TableEntity;
use canopy_core::ports::PageResponse;

/// `TableEntities` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct TableEntitiesBody {
    #[serde(default)]
    pub total_entities: Option<u64>,
    /// `null`, absent or empty on the last page.
    #[serde(default, rename = "nextPage")]
    pub next_page: Option<String>,
    pub entities_list: Vec<TableEntity>,
}

impl From<TableEntitiesBody> for PageResponse<TableEntity> {
    fn from(body: TableEntitiesBody) -> Self {
        Self {
            items: body.entities_list,
            total_count: body.total_entities,
            next_page_token: body.next_page.filter(|token| !token.is_empty()),
        }
    }
}

/// Body of a filtered `TableEntities` POST.
#[derive(Debug, Serialize)]
pub(crate) struct FilterBody<'a> {
    pub filter: &'a str,
}
