use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Activity record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Activity {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub energy_before: i64,
    pub energy_after: i64,
    pub duration_minutes: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime, // set on insert, UTC
    pub user_id: Option<String>,
}

impl Activity {
    pub fn energy_delta(&self) -> i64 {
        self.energy_after - self.energy_before
    }
}
