use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Service;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateServiceRequest {
    pub category: String,
    pub service_name: String,
    pub description: String,
    pub price: f64,
    pub vat_rate: f64,
    pub delivery_price: f64,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    pub category: Option<String>,
    pub service_name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub vat_rate: Option<f64>,
    pub delivery_price: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceList {
    pub items: Vec<Service>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<String>,
}
