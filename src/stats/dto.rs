use serde::Serialize;

/// Response body of `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityStats {
    pub total_activities: usize,
    pub avg_energy_change: f64,
    pub most_energizing: CategoryImpact,
    pub most_draining: CategoryImpact,
    pub categories: Vec<CategoryAverage>,
}

/// A category picked as an extreme. `category` is `None` when nothing is categorized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryImpact {
    pub category: Option<String>,
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAverage {
    pub category: String,
    pub avg_change: f64,
    pub count: usize,
}

impl CategoryImpact {
    pub fn none() -> Self {
        Self {
            category: None,
            change: 0.0,
        }
    }
}

impl ActivityStats {
    pub fn empty() -> Self {
        Self {
            total_activities: 0,
            avg_energy_change: 0.0,
            most_energizing: CategoryImpact::none(),
            most_draining: CategoryImpact::none(),
            categories: Vec::new(),
        }
    }
}
