use std::collections::{BTreeMap, HashSet};

use chrono::{Duration, NaiveDate};
use rusqlite::{params, OptionalExtension, Row};

use crate::error::{AppError, Result};
use crate::models::{DayCompletion, RoutineLog, RoutineStatus};

use super::repository::{conversion_error, date_column, datetime_column, format_date, new_id, Repository};

const LOG_COLUMNS: &str = "id, routine_id, user_id, log_date, status, created_at, updated_at";

impl Repository {
    pub async fn upsert_routine_log(
        &self,
        routine_id: &str,
        user_id: &str,
        date: NaiveDate,
        status: RoutineStatus,
    ) -> Result<RoutineLog> {
        let routine = routine_id.to_string();
        let user = user_id.to_string();
        let day = format_date(date);
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO routine_logs (id, routine_id, user_id, log_date, status)
                       VALUES (?1, ?2, ?3, ?4, ?5)
                       ON CONFLICT(routine_id, log_date) DO UPDATE SET
                           status = excluded.status,
                           updated_at = datetime('now')"#,
                    params![new_id(), routine, user, day, status.as_str()],
                )?;
                Ok(())
            })
            .await?;

        self.get_routine_log(routine_id, date)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("log for routine {}", routine_id)))
    }

    pub async fn get_routine_log(
        &self,
        routine_id: &str,
        date: NaiveDate,
    ) -> Result<Option<RoutineLog>> {
        let routine = routine_id.to_string();
        let day = format_date(date);
        let log = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM routine_logs WHERE routine_id = ?1 AND log_date = ?2",
                    LOG_COLUMNS
                ))?;
                let log = stmt
                    .query_row(params![routine, day], log_from_row)
                    .optional()?;
                Ok(log)
            })
            .await?;
        Ok(log)
    }

    pub async fn get_routine_logs_by_date(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<RoutineLog>> {
        self.get_routine_logs_in_range(user_id, date, date).await
    }

    pub async fn get_routine_logs_in_range(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RoutineLog>> {
        let user = user_id.to_string();
        let (from, to) = (format_date(from), format_date(to));
        let logs = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    r#"SELECT {} FROM routine_logs
                       WHERE user_id = ?1 AND log_date BETWEEN ?2 AND ?3
                       ORDER BY log_date, created_at"#,
                    LOG_COLUMNS
                ))?;
                let logs = stmt
                    .query_map(params![user, from, to], log_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(logs)
            })
            .await?;
        Ok(logs)
    }

    pub async fn delete_routine_log(&self, routine_id: &str, date: NaiveDate) -> Result<()> {
        let routine = routine_id.to_string();
        let day = format_date(date);
        self.conn
            .call(move |conn| {
                conn.execute(
                    "DELETE FROM routine_logs WHERE routine_id = ?1 AND log_date = ?2",
                    params![routine, day],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn get_completion_history(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DayCompletion>> {
        let logs = self.get_routine_logs_in_range(user_id, from, to).await?;

        let mut days: BTreeMap<NaiveDate, DayCompletion> = BTreeMap::new();
        for log in logs {
            let entry = days.entry(log.log_date).or_insert(DayCompletion {
                date: log.log_date,
                checked: 0,
                skipped: 0,
            });
            match log.status {
                RoutineStatus::Checked => entry.checked += 1,
                RoutineStatus::Skipped => entry.skipped += 1,
            }
        }
        Ok(days.into_values().collect())
    }

    /// Consecutive days with at least one checked routine, ending today.
    /// A day without checks yet does not break a streak that ran through
    /// yesterday.
    pub async fn current_streak(&self, user_id: &str, today: NaiveDate) -> Result<u32> {
        let user = user_id.to_string();
        let until = format_date(today);
        let checked_days: HashSet<NaiveDate> = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT DISTINCT log_date FROM routine_logs
                       WHERE user_id = ?1 AND status = 'checked' AND log_date <= ?2"#,
                )?;
                let days = stmt
                    .query_map(params![user, until], |row| date_column(row, 0))?
                    .collect::<std::result::Result<HashSet<_>, _>>()?;
                Ok(days)
            })
            .await?;

        let mut cursor = if checked_days.contains(&today) {
            today
        } else {
            today - Duration::days(1)
        };
        let mut streak = 0;
        while checked_days.contains(&cursor) {
            streak += 1;
            cursor -= Duration::days(1);
        }
        Ok(streak)
    }
}

fn log_from_row(row: &Row) -> rusqlite::Result<RoutineLog> {
    let status: String = row.get(4)?;
    Ok(RoutineLog {
        id: row.get(0)?,
        routine_id: row.get(1)?,
        user_id: row.get(2)?,
        log_date: date_column(row, 3)?,
        status: RoutineStatus::parse(&status).map_err(|e| conversion_error(4, e))?,
        created_at: datetime_column(row, 5)?,
        updated_at: datetime_column(row, 6)?,
    })
}
