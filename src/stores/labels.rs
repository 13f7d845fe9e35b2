use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, Validator},
    models::Label,
};

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex color pattern compiles")
});

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct NewLabel {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub background: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LabelRegistry {
    labels: Vec<Label>,
}

impl Default for LabelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn predefined(id: &str, name: &str, icon: &str, color: &str, background: &str) -> Label {
    Label {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
        background: background.to_string(),
        custom: false,
    }
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self {
            labels: vec![
                predefined("urgent", "Urgent", "flame", "#dc2626", "#fee2e2"),
                predefined("warranty", "Warranty", "shield", "#2563eb", "#dbeafe"),
                predefined("vip", "VIP customer", "star", "#ca8a04", "#fef9c3"),
                predefined("fragile", "Fragile", "alert-triangle", "#ea580c", "#ffedd5"),
                predefined("paid", "Paid", "credit-card", "#16a34a", "#dcfce7"),
            ],
        }
    }

    pub fn all(&self) -> &[Label] {
        &self.labels
    }

    pub fn get(&self, id: &str) -> Option<&Label> {
        self.labels.iter().find(|l| l.id == id)
    }

    /// Adds a custom label. Its color must differ from every existing label's color.
    pub fn create_custom(&mut self, payload: NewLabel) -> AppResult<Label> {
        let mut v = Validator::new();
        v.require("name", &payload.name, "Label name is required");
        if v.require("color", &payload.color, "Color is required")
            && !HEX_COLOR.is_match(payload.color.trim())
        {
            v.add("color", "Color must be a hex value like #1f2937");
        }
        v.finish()?;

        let color = normalize_hex(&payload.color);
        if self
            .labels
            .iter()
            .any(|l| normalize_hex(&l.color) == color)
        {
            return Err(AppError::Conflict(format!(
                "Color {color} is already used by another label"
            )));
        }

        let label = Label {
            id: Uuid::new_v4().to_string(),
            name: payload.name.trim().to_string(),
            icon: if payload.icon.trim().is_empty() {
                "tag".to_string()
            } else {
                payload.icon.trim().to_string()
            },
            background: payload
                .background
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| "#f3f4f6".to_string()),
            color,
            custom: true,
        };
        self.labels.push(label.clone());
        Ok(label)
    }

    pub fn delete_custom(&mut self, id: &str) -> AppResult<Label> {
        let index = self
            .labels
            .iter()
            .position(|l| l.id == id)
            .ok_or(AppError::NotFound)?;
        if !self.labels[index].custom {
            return Err(AppError::BadRequest("Predefined labels cannot be deleted".into()));
        }
        Ok(self.labels.remove(index))
    }
}

/// Lowercase six-digit form, so `#ABC` and `#aabbcc` compare equal.
fn normalize_hex(color: &str) -> String {
    let hex = color.trim().trim_start_matches('#').to_ascii_lowercase();
    if hex.len() == 3 {
        let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
        format!("#{expanded}")
    } else {
        format!("#{hex}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(name: &str, color: &str) -> NewLabel {
        NewLabel {
            name: name.into(),
            icon: String::new(),
            color: color.into(),
            background: None,
        }
    }

    #[test]
    fn reused_color_is_rejected_and_list_unchanged() {
        let mut registry = LabelRegistry::new();
        let before = registry.all().to_vec();

        let err = registry.create_custom(label("Rush", "#DC2626")).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(registry.all(), before.as_slice());
    }

    #[test]
    fn custom_colors_collide_with_each_other() {
        let mut registry = LabelRegistry::new();
        let first = registry.create_custom(label("Loaner", "#abc")).unwrap();
        assert_eq!(first.color, "#aabbcc");
        assert!(first.custom);
        assert!(registry.create_custom(label("Other", "#AABBCC")).is_err());
        assert_eq!(registry.all().len(), 6);
    }

    #[test]
    fn duplicate_names_are_allowed() {
        let mut registry = LabelRegistry::new();
        registry.create_custom(label("Urgent", "#111111")).unwrap();
        assert_eq!(registry.all().iter().filter(|l| l.name == "Urgent").count(), 2);
    }

    #[test]
    fn invalid_color_is_a_field_error() {
        let mut registry = LabelRegistry::new();
        let err = registry.create_custom(label("Blue", "blue")).unwrap_err();
        assert!(matches!(err, AppError::Validation(fields) if fields.contains_key("color")));
    }

    #[test]
    fn predefined_labels_cannot_be_deleted() {
        let mut registry = LabelRegistry::new();
        assert!(matches!(
            registry.delete_custom("urgent"),
            Err(AppError::BadRequest(_))
        ));
        let custom = registry.create_custom(label("Loaner", "#123456")).unwrap();
        assert_eq!(registry.delete_custom(&custom.id).unwrap().id, custom.id);
    }
}
