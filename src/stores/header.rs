use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Notification, NotificationCategory},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Language {
    pub code: String,
    pub name: String,
}

const LANGUAGES: [(&str, &str); 6] = [
    ("en", "English"),
    ("es", "Español"),
    ("ca", "Català"),
    ("fr", "Français"),
    ("de", "Deutsch"),
    ("pt", "Português"),
];

/// State behind the header's notification and language dropdowns.
#[derive(Debug, Clone)]
pub struct HeaderPanels {
    notifications: Vec<Notification>,
    language: String,
}

impl HeaderPanels {
    pub fn new(notifications: Vec<Notification>) -> Self {
        Self {
            notifications,
            language: "en".to_string(),
        }
    }

    pub fn notifications(
        &self,
        category: Option<NotificationCategory>,
        unread_only: bool,
    ) -> Vec<Notification> {
        let mut items: Vec<Notification> = self
            .notifications
            .iter()
            .filter(|n| category.is_none_or(|c| n.category == c))
            .filter(|n| !unread_only || !n.read)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        items
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    pub fn mark_read(&mut self, id: &str) -> AppResult<Notification> {
        let notification = self
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(AppError::NotFound)?;
        notification.read = true;
        Ok(notification.clone())
    }

    /// Returns how many notifications changed.
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for n in self.notifications.iter_mut().filter(|n| !n.read) {
            n.read = true;
            changed += 1;
        }
        changed
    }

    pub fn dismiss(&mut self, id: &str) -> AppResult<Notification> {
        let index = self
            .notifications
            .iter()
            .position(|n| n.id == id)
            .ok_or(AppError::NotFound)?;
        Ok(self.notifications.remove(index))
    }

    pub fn languages(&self) -> Vec<Language> {
        LANGUAGES
            .iter()
            .map(|(code, name)| Language {
                code: code.to_string(),
                name: name.to_string(),
            })
            .collect()
    }

    pub fn current_language(&self) -> Language {
        self.languages()
            .into_iter()
            .find(|l| l.code == self.language)
            .unwrap_or_else(|| Language {
                code: self.language.clone(),
                name: self.language.clone(),
            })
    }

    pub fn set_language(&mut self, code: &str) -> AppResult<Language> {
        let code = code.trim().to_ascii_lowercase();
        if !LANGUAGES.iter().any(|(c, _)| *c == code) {
            return Err(AppError::BadRequest(format!("Unsupported language: {code}")));
        }
        self.language = code;
        Ok(self.current_language())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use chrono::Utc;

    #[test]
    fn marking_read_updates_unread_count() {
        let mut panels = HeaderPanels::new(seed::notifications(Utc::now()));
        assert_eq!(panels.unread_count(), 3);
        panels.mark_read("n1").unwrap();
        assert_eq!(panels.unread_count(), 2);
        assert_eq!(panels.mark_all_read(), 2);
        assert_eq!(panels.unread_count(), 0);
        assert!(panels.mark_read("missing").is_err());
    }

    #[test]
    fn filters_by_category_newest_first() {
        let panels = HeaderPanels::new(seed::notifications(Utc::now()));
        let orders = panels.notifications(Some(NotificationCategory::Order), false);
        let ids: Vec<_> = orders.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n1", "n2"]);
        assert_eq!(panels.notifications(None, true).len(), 3);
    }

    #[test]
    fn only_supported_languages_can_be_selected() {
        let mut panels = HeaderPanels::new(Vec::new());
        assert_eq!(panels.current_language().code, "en");
        assert_eq!(panels.set_language("ES").unwrap().name, "Español");
        assert!(panels.set_language("xx").is_err());
        assert_eq!(panels.current_language().code, "es");
    }
}
