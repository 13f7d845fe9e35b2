use uuid::Uuid;

use crate::{
    dto::services::{CreateServiceRequest, UpdateServiceRequest},
    error::{AppError, AppResult, Validator},
    models::Service,
};

#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    services: Vec<Service>,
}

impl ServiceCatalog {
    pub fn new(services: Vec<Service>) -> Self {
        Self { services }
    }

    pub fn get(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn search(&self, q: Option<&str>, category: Option<&str>) -> Vec<Service> {
        let needle = q.map(str::trim).filter(|q| !q.is_empty()).map(str::to_lowercase);
        self.services
            .iter()
            .filter(|s| {
                category
                    .filter(|c| !c.is_empty())
                    .is_none_or(|c| s.category.eq_ignore_ascii_case(c))
            })
            .filter(|s| {
                needle.as_ref().is_none_or(|q| {
                    s.service_name.to_lowercase().contains(q)
                        || s.description.to_lowercase().contains(q)
                        || s.category.to_lowercase().contains(q)
                })
            })
            .cloned()
            .collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for service in &self.services {
            if !seen.iter().any(|c| c.eq_ignore_ascii_case(&service.category)) {
                seen.push(service.category.clone());
            }
        }
        seen
    }

    pub fn add(&mut self, payload: CreateServiceRequest) -> AppResult<Service> {
        let mut v = Validator::new();
        v.require("category", &payload.category, "Category is required");
        v.require("serviceName", &payload.service_name, "Service name is required");
        check_amounts(
            &mut v,
            Some(payload.price),
            Some(payload.vat_rate),
            Some(payload.delivery_price),
        );
        v.finish()?;

        let service = Service {
            id: Uuid::new_v4().to_string(),
            category: payload.category.trim().to_string(),
            service_name: payload.service_name.trim().to_string(),
            description: payload.description,
            price: payload.price,
            vat_rate: payload.vat_rate,
            delivery_price: payload.delivery_price,
        };
        self.services.push(service.clone());
        Ok(service)
    }

    pub fn update(&mut self, id: &str, payload: UpdateServiceRequest) -> AppResult<Service> {
        let mut v = Validator::new();
        if let Some(category) = &payload.category {
            v.require("category", category, "Category is required");
        }
        if let Some(name) = &payload.service_name {
            v.require("serviceName", name, "Service name is required");
        }
        check_amounts(&mut v, payload.price, payload.vat_rate, payload.delivery_price);
        v.finish()?;

        let service = self
            .services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(AppError::NotFound)?;
        if let Some(category) = payload.category {
            service.category = category.trim().to_string();
        }
        if let Some(name) = payload.service_name {
            service.service_name = name.trim().to_string();
        }
        if let Some(description) = payload.description {
            service.description = description;
        }
        if let Some(price) = payload.price {
            service.price = price;
        }
        if let Some(vat_rate) = payload.vat_rate {
            service.vat_rate = vat_rate;
        }
        if let Some(delivery_price) = payload.delivery_price {
            service.delivery_price = delivery_price;
        }
        Ok(service.clone())
    }

    pub fn remove(&mut self, id: &str) -> AppResult<Service> {
        let index = self
            .services
            .iter()
            .position(|s| s.id == id)
            .ok_or(AppError::NotFound)?;
        Ok(self.services.remove(index))
    }
}

fn check_amounts(
    v: &mut Validator,
    price: Option<f64>,
    vat_rate: Option<f64>,
    delivery_price: Option<f64>,
) {
    if price.is_some_and(|p| !p.is_finite() || p < 0.0) {
        v.add("price", "Price cannot be negative");
    }
    if vat_rate.is_some_and(|r| !(0.0..=100.0).contains(&r)) {
        v.add("vatRate", "VAT rate must be between 0 and 100");
    }
    if delivery_price.is_some_and(|p| !p.is_finite() || p < 0.0) {
        v.add("deliveryPrice", "Delivery price cannot be negative");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn search_filters_by_category_and_text() {
        let catalog = ServiceCatalog::new(seed::services());
        assert_eq!(catalog.search(None, Some("laptops")).len(), 2);
        let found = catalog.search(Some("battery"), None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "svc-2");
        assert_eq!(catalog.search(Some("battery"), Some("Laptops")).len(), 0);
    }

    #[test]
    fn categories_are_distinct() {
        let catalog = ServiceCatalog::new(seed::services());
        assert_eq!(catalog.categories(), vec!["Smartphones", "Laptops", "Tablets"]);
    }

    #[test]
    fn add_rejects_bad_amounts() {
        let mut catalog = ServiceCatalog::default();
        let err = catalog
            .add(CreateServiceRequest {
                category: "Consoles".into(),
                service_name: "HDMI port".into(),
                price: -1.0,
                vat_rate: 121.0,
                ..Default::default()
            })
            .unwrap_err();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("vatRate"));
        assert!(catalog.search(None, None).is_empty());
    }

    #[test]
    fn update_is_partial() {
        let mut catalog = ServiceCatalog::new(seed::services());
        let updated = catalog
            .update(
                "svc-4",
                UpdateServiceRequest {
                    price: Some(35.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.price, 35.0);
        assert_eq!(updated.service_name, "Diagnostics");
        assert!(catalog.remove("svc-4").is_ok());
        assert!(catalog.get("svc-4").is_none());
    }
}
