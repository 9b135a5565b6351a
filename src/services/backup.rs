use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::{MoodLog, Quote, Routine, RoutineLog, User};

#[derive(Debug, Serialize)]
pub struct Backup {
    pub exported_at: DateTime<Utc>,
    pub user: User,
    pub routines: Vec<Routine>,
    pub routine_logs: Vec<RoutineLog>,
    pub mood_logs: Vec<MoodLog>,
    pub favorite_quotes: Vec<Quote>,
    pub viewed_quote_ids: Vec<String>,
}

fn all_time() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN),
        NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX),
    )
}

pub async fn collect_backup(repo: &Repository, user_id: &str) -> Result<Backup> {
    let user = repo
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;
    let (from, to) = all_time();

    Ok(Backup {
        exported_at: Utc::now(),
        routines: repo.get_routines_by_user(user_id).await?,
        routine_logs: repo.get_routine_logs_in_range(user_id, from, to).await?,
        mood_logs: repo.get_mood_logs_in_range(user_id, from, to).await?,
        favorite_quotes: repo.get_favorite_quotes(user_id).await?,
        viewed_quote_ids: repo.get_viewed_quote_ids(user_id).await?,
        user,
    })
}

pub async fn export_backup(repo: &Repository, user_id: &str, path: &Path) -> Result<()> {
    let backup = collect_backup(repo, user_id).await?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, serde_json::to_string_pretty(&backup)?)?;
    tracing::info!("Exported backup for {} to {:?}", user_id, path);
    Ok(())
}
