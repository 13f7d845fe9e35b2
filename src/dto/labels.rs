use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Label;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LabelList {
    pub items: Vec<Label>,
}
