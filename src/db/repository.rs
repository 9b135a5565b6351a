use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use crate::error::Result;

use super::schema::{upgrade_legacy_columns, ALL_TABLES, SCHEMA};

pub(super) const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct Repository {
    pub(super) conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;
        Self::init(conn).await
    }

    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            upgrade_legacy_columns(conn)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    pub async fn clear_all_data(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                let tx = conn.transaction()?;
                for table in ALL_TABLES {
                    if let Err(e) = tx.execute(&format!("DELETE FROM {}", table), []) {
                        tx.rollback()?;
                        return Err(e.into());
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await?;
        tracing::info!("Cleared all data");
        Ok(())
    }
}

pub(super) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub(super) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(super) fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56+00:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Try SQLite datetime format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

pub(super) fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, err.into())
}

pub(super) fn datetime_column(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    Ok(row
        .get::<_, String>(idx)
        .ok()
        .and_then(|s| parse_datetime(&s))
        .unwrap_or_else(Utc::now))
}

pub(super) fn date_column(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(idx)?;
    NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|e| conversion_error(idx, e))
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;

    use super::Repository;
    use crate::models::{NewQuote, NewUser, Quote, User};

    pub async fn repo() -> Repository {
        Repository::in_memory().await.unwrap()
    }

    pub async fn user(repo: &Repository, name: &str) -> User {
        repo.create_user(NewUser::named(name)).await.unwrap()
    }

    pub fn new_quote(author: &str) -> NewQuote {
        NewQuote {
            text_ko: format!("{}의 말", author),
            text_en: format!("Words of {}", author),
            author: author.to_string(),
            era: None,
            image_url: None,
            is_published: true,
        }
    }

    pub async fn quote(repo: &Repository, author: &str) -> Quote {
        repo.create_quote(new_quote(author)).await.unwrap()
    }

    pub fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }
}
