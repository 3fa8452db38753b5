use serde::Deserialize;

/// Validated fields for a new activity. `id` and `timestamp` are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub name: String,
    pub category: Option<String>,
    pub energy_before: i64,
    pub energy_after: i64,
    pub duration_minutes: f64,
    pub user_id: Option<String>,
}

/// Validated partial update. `None` means "leave unchanged";
/// `category: Some(None)` clears the category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityPatch {
    pub name: Option<String>,
    pub category: Option<Option<String>>,
    pub energy_before: Option<i64>,
    pub energy_after: Option<i64>,
    pub duration_minutes: Option<f64>,
}

impl ActivityPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.energy_before.is_none()
            && self.energy_after.is_none()
            && self.duration_minutes.is_none()
    }
}

/// Query string for `GET /api/activities`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityFilter {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub category: Option<String>,
}

impl ActivityFilter {
    pub fn for_user(user_id: Option<String>) -> Self {
        Self {
            user_id,
            category: None,
        }
    }

    /// Empty query values (`?userId=`) behave as if absent.
    pub fn normalized(self) -> Self {
        Self {
            user_id: non_blank(self.user_id),
            category: non_blank(self.category),
        }
    }
}

/// Query string carrying only the optional user scope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

impl UserQuery {
    pub fn user_id(self) -> Option<String> {
        non_blank(self.user_id)
    }
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_are_dropped() {
        let f = ActivityFilter {
            user_id: Some("  ".into()),
            category: Some(" Work ".into()),
        }
        .normalized();
        assert_eq!(f.user_id, None);
        assert_eq!(f.category.as_deref(), Some("Work"));
        assert_eq!(UserQuery { user_id: Some(String::new()) }.user_id(), None);
    }

    #[test]
    fn default_patch_is_empty() {
        assert!(ActivityPatch::default().is_empty());
        assert!(!ActivityPatch {
            category: Some(None),
            ..Default::default()
        }
        .is_empty());
    }
}
