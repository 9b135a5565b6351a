use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use crate::error::{AppError, Result};
use crate::models::{Mood, MoodLog};

use super::repository::{conversion_error, date_column, datetime_column, format_date, new_id, Repository};

const MOOD_COLUMNS: &str = "id, user_id, log_date, mood, quote_id, created_at, updated_at";

impl Repository {
    pub async fn upsert_mood_log(
        &self,
        user_id: &str,
        date: NaiveDate,
        mood: Mood,
        quote_id: Option<&str>,
    ) -> Result<MoodLog> {
        let user = user_id.to_string();
        let day = format_date(date);
        let quote = quote_id.map(str::to_string);
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO mood_logs (id, user_id, log_date, mood, quote_id)
                       VALUES (?1, ?2, ?3, ?4, ?5)
                       ON CONFLICT(user_id, log_date) DO UPDATE SET
                           mood = excluded.mood,
                           quote_id = excluded.quote_id,
                           updated_at = datetime('now')"#,
                    params![new_id(), user, day, mood.as_str(), quote],
                )?;
                Ok(())
            })
            .await?;

        self.get_mood_log(user_id, date)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("mood log for {}", date)))
    }

    pub async fn get_mood_log(&self, user_id: &str, date: NaiveDate) -> Result<Option<MoodLog>> {
        let user = user_id.to_string();
        let day = format_date(date);
        let log = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM mood_logs WHERE user_id = ?1 AND log_date = ?2",
                    MOOD_COLUMNS
                ))?;
                let log = stmt.query_row(params![user, day], mood_from_row).optional()?;
                Ok(log)
            })
            .await?;
        Ok(log)
    }

    pub async fn get_mood_logs_in_range(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MoodLog>> {
        let user = user_id.to_string();
        let (from, to) = (format_date(from), format_date(to));
        let logs = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    r#"SELECT {} FROM mood_logs
                       WHERE user_id = ?1 AND log_date BETWEEN ?2 AND ?3
                       ORDER BY log_date"#,
                    MOOD_COLUMNS
                ))?;
                let logs = stmt
                    .query_map(params![user, from, to], mood_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(logs)
            })
            .await?;
        Ok(logs)
    }

    pub async fn delete_mood_log(&self, user_id: &str, date: NaiveDate) -> Result<()> {
        let user = user_id.to_string();
        let day = format_date(date);
        self.conn
            .call(move |conn| {
                conn.execute(
                    "DELETE FROM mood_logs WHERE user_id = ?1 AND log_date = ?2",
                    params![user, day],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}

fn mood_from_row(row: &Row) -> rusqlite::Result<MoodLog> {
    let mood: String = row.get(3)?;
    Ok(MoodLog {
        id: row.get(0)?,
        user_id: row.get(1)?,
        log_date: date_column(row, 2)?,
        mood: Mood::parse(&mood).map_err(|e| conversion_error(3, e))?,
        quote_id: row.get(4)?,
        created_at: datetime_column(row, 5)?,
        updated_at: datetime_column(row, 6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::super::repository::test_support::*;
    use crate::models::Mood;

    #[tokio::test]
    async fn test_one_mood_per_user_per_day() {
        let repo = repo().await;
        let user = user(&repo, "Mina").await;
        let q = quote(&repo, "Seneca").await;

        let first = repo
            .upsert_mood_log(&user.id, day(8), Mood::Low, None)
            .await
            .unwrap();
        let second = repo
            .upsert_mood_log(&user.id, day(8), Mood::Great, Some(&q.id))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.mood, Mood::Great);
        assert_eq!(second.quote_id.as_deref(), Some(q.id.as_str()));
        assert_eq!(
            repo.get_mood_logs_in_range(&user.id, day(1), day(31))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_moods_are_per_user() {
        let repo = repo().await;
        let mina = user(&repo, "Mina").await;
        let jun = user(&repo, "Jun").await;
        repo.upsert_mood_log(&mina.id, day(8), Mood::Good, None)
            .await
            .unwrap();
        repo.upsert_mood_log(&jun.id, day(8), Mood::Bad, None)
            .await
            .unwrap();

        let mina_mood = repo.get_mood_log(&mina.id, day(8)).await.unwrap().unwrap();
        assert_eq!(mina_mood.mood, Mood::Good);
    }

    #[tokio::test]
    async fn test_range_and_delete() {
        let repo = repo().await;
        let user = user(&repo, "Mina").await;
        repo.upsert_mood_log(&user.id, day(1), Mood::Okay, None)
            .await
            .unwrap();
        repo.upsert_mood_log(&user.id, day(2), Mood::Good, None)
            .await
            .unwrap();
        repo.upsert_mood_log(&user.id, day(9), Mood::Great, None)
            .await
            .unwrap();

        let week = repo
            .get_mood_logs_in_range(&user.id, day(1), day(7))
            .await
            .unwrap();
        assert_eq!(
            week.iter().map(|m| m.mood).collect::<Vec<_>>(),
            vec![Mood::Okay, Mood::Good]
        );

        repo.delete_mood_log(&user.id, day(1)).await.unwrap();
        assert!(repo.get_mood_log(&user.id, day(1)).await.unwrap().is_none());
    }
}
