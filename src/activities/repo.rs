use anyhow::Context;
use async_trait::async_trait;
use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::activities::dto::{ActivityFilter, ActivityPatch, NewActivity};
use crate::activities::repo_types::Activity;

const SELECT_ACTIVITY: &str = r#"
    SELECT id, name, category, energy_before, energy_after, duration_minutes, timestamp, user_id
      FROM activities
"#;

/// Persistence for activity records. Lookups that miss return `None` / `false`.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn insert(&self, new: NewActivity) -> anyhow::Result<Activity>;
    async fn get(&self, id: i64) -> anyhow::Result<Option<Activity>>;
    async fn list(&self, filter: &ActivityFilter) -> anyhow::Result<Vec<Activity>>;
    async fn update(&self, id: i64, patch: ActivityPatch) -> anyhow::Result<Option<Activity>>;
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct SqliteActivityStore {
    db: SqlitePool,
}

impl SqliteActivityStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ActivityStore for SqliteActivityStore {
    async fn insert(&self, new: NewActivity) -> anyhow::Result<Activity> {
        let activity = sqlx::query_as::<_, Activity>(
            r#"
            INSERT INTO activities
                (name, category, energy_before, energy_after, duration_minutes, timestamp, user_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id, name, category, energy_before, energy_after, duration_minutes, timestamp, user_id
            "#,
        )
        .bind(&new.name)
        .bind(&new.category)
        .bind(new.energy_before)
        .bind(new.energy_after)
        .bind(new.duration_minutes)
        .bind(OffsetDateTime::now_utc())
        .bind(&new.user_id)
        .fetch_one(&self.db)
        .await
        .context("insert activity")?;
        Ok(activity)
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<Activity>> {
        let activity = sqlx::query_as::<_, Activity>(&format!("{SELECT_ACTIVITY} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("get activity")?;
        Ok(activity)
    }

    async fn list(&self, filter: &ActivityFilter) -> anyhow::Result<Vec<Activity>> {
        let rows = sqlx::query_as::<_, Activity>(&format!(
            r#"{SELECT_ACTIVITY}
             WHERE (?1 IS NULL OR user_id = ?1)
               AND (?2 IS NULL OR category = ?2)
             ORDER BY id DESC
            "#
        ))
        .bind(&filter.user_id)
        .bind(&filter.category)
        .fetch_all(&self.db)
        .await
        .context("list activities")?;
        Ok(rows)
    }

    async fn update(&self, id: i64, patch: ActivityPatch) -> anyhow::Result<Option<Activity>> {
        let ActivityPatch {
            name,
            category,
            energy_before,
            energy_after,
            duration_minutes,
        } = patch;

        // Single statement: absent fields keep their stored value. `?2` tells an
        // explicit `category: null` apart from a category that was not sent.
        let activity = sqlx::query_as::<_, Activity>(
            r#"
            UPDATE activities
               SET name             = COALESCE(?1, name),
                   category         = CASE WHEN ?2 THEN ?3 ELSE category END,
                   energy_before    = COALESCE(?4, energy_before),
                   energy_after     = COALESCE(?5, energy_after),
                   duration_minutes = COALESCE(?6, duration_minutes)
             WHERE id = ?7
            RETURNING id, name, category, energy_before, energy_after, duration_minutes, timestamp, user_id
            "#,
        )
        .bind(name)
        .bind(category.is_some())
        .bind(category.flatten())
        .bind(energy_before)
        .bind(energy_after)
        .bind(duration_minutes)
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("update activity")?;
        Ok(activity)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM activities WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete activity")?;
        Ok(res.rows_affected() > 0)
    }
}
