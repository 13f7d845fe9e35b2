use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Paging details of a list response. Single-item responses send every field as null.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
        }
    }

    /// An unpaginated list: one page holding every item.
    pub fn whole<T>(items: &[T]) -> Self {
        let total = items.len() as i64;
        Self::new(1, total, total)
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
        }
    }
}

/// Response envelope. `message` doubles as the toast text shown by the dashboard.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_list_meta_is_a_single_page() {
        assert_eq!(Meta::whole(&["a", "b", "c"]), Meta::new(1, 3, 3));
        assert_eq!(Meta::whole::<u8>(&[]), Meta::new(1, 0, 0));
    }
}
