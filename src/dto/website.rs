use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::stores::website::{PreviewRow, WebsiteDocument};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleSectionRequest {
    pub selected: bool,
}

/// Index of the item an add operation created.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemAdded {
    pub index: usize,
    pub document: WebsiteDocument,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FormPreview {
    pub rows: Vec<PreviewRow>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishedStore {
    pub store_id: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublishedStoreList {
    pub items: Vec<PublishedStore>,
}
