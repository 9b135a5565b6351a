use rusqlite::{params, OptionalExtension, Row};

use crate::error::{AppError, Result};
use crate::models::{NewQuote, Quote};

use super::repository::{datetime_column, new_id, Repository};
use super::seed::seed_quotes;

const QUOTE_COLUMNS: &str =
    "id, text_ko, text_en, author, era, image_url, is_published, created_at";

fn validate(quote: &NewQuote) -> Result<()> {
    if quote.text_ko.trim().is_empty() && quote.text_en.trim().is_empty() {
        return Err(AppError::InvalidInput("quote needs text in at least one language".to_string()));
    }
    if quote.author.trim().is_empty() {
        return Err(AppError::InvalidInput("quote author must not be empty".to_string()));
    }
    Ok(())
}

impl Repository {
    pub async fn create_quote(&self, quote: NewQuote) -> Result<Quote> {
        validate(&quote)?;
        let id = new_id();
        let quote_id = id.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO quotes (id, text_ko, text_en, author, era, image_url, is_published)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
                    params![
                        quote_id,
                        quote.text_ko,
                        quote.text_en,
                        quote.author,
                        quote.era,
                        quote.image_url,
                        quote.is_published,
                    ],
                )?;
                Ok(())
            })
            .await?;

        self.get_quote(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("quote {}", id)))
    }

    pub async fn insert_quotes(&self, quotes: Vec<NewQuote>) -> Result<usize> {
        let valid: Vec<NewQuote> = quotes
            .into_iter()
            .filter(|q| match validate(q) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Skipping quote by {:?}: {}", q.author, e);
                    false
                }
            })
            .collect();

        let inserted = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"INSERT INTO quotes (id, text_ko, text_en, author, era, image_url, is_published)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
                )?;
                let mut inserted = 0;
                for quote in valid {
                    inserted += stmt.execute(params![
                        new_id(),
                        quote.text_ko,
                        quote.text_en,
                        quote.author,
                        quote.era,
                        quote.image_url,
                        quote.is_published,
                    ])?;
                }
                Ok(inserted)
            })
            .await?;
        Ok(inserted)
    }

    pub async fn seed_quotes_if_empty(&self) -> Result<usize> {
        if self.count_quotes().await? > 0 {
            return Ok(0);
        }
        let inserted = self.insert_quotes(seed_quotes()).await?;
        tracing::info!("Seeded {} quotes", inserted);
        Ok(inserted)
    }

    pub async fn get_quote(&self, id: &str) -> Result<Option<Quote>> {
        let id = id.to_string();
        let quote = self
            .conn
            .call(move |conn| {
                let mut stmt =
                    conn.prepare(&format!("SELECT {} FROM quotes WHERE id = ?1", QUOTE_COLUMNS))?;
                let quote = stmt.query_row(params![id], quote_from_row).optional()?;
                Ok(quote)
            })
            .await?;
        Ok(quote)
    }

    pub async fn get_all_quotes(&self) -> Result<Vec<Quote>> {
        self.query_quotes(format!(
            "SELECT {} FROM quotes ORDER BY created_at, rowid",
            QUOTE_COLUMNS
        ))
        .await
    }

    pub async fn get_published_quotes(&self) -> Result<Vec<Quote>> {
        self.query_quotes(format!(
            "SELECT {} FROM quotes WHERE is_published = 1 ORDER BY created_at, rowid",
            QUOTE_COLUMNS
        ))
        .await
    }

    async fn query_quotes(&self, sql: String) -> Result<Vec<Quote>> {
        let quotes = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let quotes = stmt
                    .query_map([], quote_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(quotes)
            })
            .await?;
        Ok(quotes)
    }

    pub async fn update_quote(&self, id: &str, quote: NewQuote) -> Result<Quote> {
        validate(&quote)?;
        let quote_id = id.to_string();
        let changed = self
            .conn
            .call(move |conn| {
                let changed = conn.execute(
                    r#"UPDATE quotes
                       SET text_ko = ?1, text_en = ?2, author = ?3, era = ?4, image_url = ?5, is_published = ?6
                       WHERE id = ?7"#,
                    params![
                        quote.text_ko,
                        quote.text_en,
                        quote.author,
                        quote.era,
                        quote.image_url,
                        quote.is_published,
                        quote_id,
                    ],
                )?;
                Ok(changed)
            })
            .await?;
        if changed == 0 {
            return Err(AppError::NotFound(format!("quote {}", id)));
        }

        self.get_quote(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("quote {}", id)))
    }

    pub async fn set_quote_published(&self, id: &str, is_published: bool) -> Result<()> {
        let id = id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "UPDATE quotes SET is_published = ?1 WHERE id = ?2",
                    params![is_published, id],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn delete_quote(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM favorite_quotes WHERE quote_id = ?1", params![id])?;
                conn.execute("DELETE FROM viewed_quotes WHERE quote_id = ?1", params![id])?;
                conn.execute(
                    "UPDATE mood_logs SET quote_id = NULL WHERE quote_id = ?1",
                    params![id],
                )?;
                conn.execute("DELETE FROM quotes WHERE id = ?1", params![id])?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn count_quotes(&self) -> Result<u32> {
        let count = self
            .conn
            .call(|conn| {
                let count: u32 =
                    conn.query_row("SELECT COUNT(*) FROM quotes", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;
        Ok(count)
    }

    pub async fn get_random_quote(&self) -> Result<Option<Quote>> {
        let quote = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM quotes WHERE is_published = 1 ORDER BY RANDOM() LIMIT 1",
                    QUOTE_COLUMNS
                ))?;
                let quote = stmt.query_row([], quote_from_row).optional()?;
                Ok(quote)
            })
            .await?;
        Ok(quote)
    }

    /// A random published quote the user has not seen yet. Once every
    /// published quote has been viewed, falls back to any random one.
    pub async fn get_unviewed_random_quote(&self, user_id: &str) -> Result<Option<Quote>> {
        let user_id = user_id.to_string();
        let unviewed = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    r#"SELECT {} FROM quotes
                       WHERE is_published = 1
                         AND id NOT IN (SELECT quote_id FROM viewed_quotes WHERE user_id = ?1)
                       ORDER BY RANDOM() LIMIT 1"#,
                    QUOTE_COLUMNS
                ))?;
                let quote = stmt.query_row(params![user_id], quote_from_row).optional()?;
                Ok(quote)
            })
            .await?;

        match unviewed {
            Some(quote) => Ok(Some(quote)),
            None => self.get_random_quote().await,
        }
    }
}

pub(super) fn quote_from_row(row: &Row) -> rusqlite::Result<Quote> {
    Ok(Quote {
        id: row.get(0)?,
        text_ko: row.get(1)?,
        text_en: row.get(2)?,
        author: row.get(3)?,
        era: row.get(4)?,
        image_url: row.get(5)?,
        is_published: row.get::<_, i64>(6)? != 0,
        created_at: datetime_column(row, 7)?,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::super::repository::test_support::*;
    use crate::error::AppError;
    use crate::models::{Mood, NewQuote};

    #[tokio::test]
    async fn test_create_quote_requires_text_and_author() {
        let repo = repo().await;
        let mut blank = new_quote("Anon");
        blank.text_ko.clear();
        blank.text_en.clear();
        assert!(matches!(
            repo.create_quote(blank).await.unwrap_err(),
            AppError::InvalidInput(_)
        ));

        let mut no_author = new_quote("Anon");
        no_author.author = " ".to_string();
        assert!(repo.create_quote(no_author).await.is_err());
    }

    #[tokio::test]
    async fn test_published_filter() {
        let repo = repo().await;
        let shown = quote(&repo, "Lao Tzu").await;
        let hidden = quote(&repo, "Draft").await;
        repo.set_quote_published(&hidden.id, false).await.unwrap();

        let published = repo.get_published_quotes().await.unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].id, shown.id);
        assert_eq!(repo.get_all_quotes().await.unwrap().len(), 2);

        for _ in 0..10 {
            let picked = repo.get_random_quote().await.unwrap().unwrap();
            assert_eq!(picked.id, shown.id);
        }
    }

    #[tokio::test]
    async fn test_random_quote_on_empty_table() {
        let repo = repo().await;
        assert!(repo.get_random_quote().await.unwrap().is_none());
        assert!(repo.get_unviewed_random_quote("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unviewed_random_quote_skips_viewed() {
        let repo = repo().await;
        let user = user(&repo, "Mina").await;
        let a = quote(&repo, "A").await;
        let b = quote(&repo, "B").await;
        let c = quote(&repo, "C").await;
        repo.add_viewed_quote(&user.id, &a.id).await.unwrap();
        repo.add_viewed_quote(&user.id, &c.id).await.unwrap();

        for _ in 0..20 {
            let picked = repo.get_unviewed_random_quote(&user.id).await.unwrap().unwrap();
            assert_eq!(picked.id, b.id);
        }
    }

    #[tokio::test]
    async fn test_unviewed_random_quote_falls_back_when_all_viewed() {
        let repo = repo().await;
        let user = user(&repo, "Mina").await;
        let a = quote(&repo, "A").await;
        let b = quote(&repo, "B").await;
        repo.add_viewed_quote(&user.id, &a.id).await.unwrap();
        repo.add_viewed_quote(&user.id, &b.id).await.unwrap();

        let ids: HashSet<_> = [a.id, b.id].into_iter().collect();
        let picked = repo.get_unviewed_random_quote(&user.id).await.unwrap().unwrap();
        assert!(ids.contains(&picked.id));
    }

    #[tokio::test]
    async fn test_viewed_by_other_user_does_not_count() {
        let repo = repo().await;
        let mina = user(&repo, "Mina").await;
        let jun = user(&repo, "Jun").await;
        let a = quote(&repo, "A").await;
        let b = quote(&repo, "B").await;
        repo.add_viewed_quote(&jun.id, &a.id).await.unwrap();
        repo.add_viewed_quote(&mina.id, &b.id).await.unwrap();

        let picked = repo.get_unviewed_random_quote(&mina.id).await.unwrap().unwrap();
        assert_eq!(picked.id, a.id);
    }

    #[tokio::test]
    async fn test_update_quote() {
        let repo = repo().await;
        let original = quote(&repo, "Seneca").await;

        let updated = repo
            .update_quote(
                &original.id,
                NewQuote {
                    era: Some("Ancient Rome".to_string()),
                    is_published: false,
                    ..new_quote("Seneca")
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.era.as_deref(), Some("Ancient Rome"));
        assert!(!updated.is_published);
        assert!(matches!(
            repo.update_quote("missing", new_quote("X")).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_quote_detaches_references() {
        let repo = repo().await;
        let user = user(&repo, "Mina").await;
        let q = quote(&repo, "Seneca").await;
        repo.add_favorite_quote(&user.id, &q.id).await.unwrap();
        repo.add_viewed_quote(&user.id, &q.id).await.unwrap();
        repo.upsert_mood_log(&user.id, day(5), Mood::Good, Some(&q.id))
            .await
            .unwrap();

        repo.delete_quote(&q.id).await.unwrap();

        assert!(repo.get_quote(&q.id).await.unwrap().is_none());
        assert!(repo.get_favorite_quotes(&user.id).await.unwrap().is_empty());
        assert_eq!(repo.count_viewed_quotes(&user.id).await.unwrap(), 0);
        let mood = repo.get_mood_log(&user.id, day(5)).await.unwrap().unwrap();
        assert_eq!(mood.quote_id, None);
    }

    #[tokio::test]
    async fn test_seed_only_runs_on_empty_table() {
        let repo = repo().await;
        let seeded = repo.seed_quotes_if_empty().await.unwrap();
        assert!(seeded > 0);
        assert_eq!(repo.count_quotes().await.unwrap() as usize, seeded);

        assert_eq!(repo.seed_quotes_if_empty().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_quotes_skips_invalid() {
        let repo = repo().await;
        let mut bad = new_quote("Nobody");
        bad.author.clear();
        let inserted = repo
            .insert_quotes(vec![new_quote("A"), bad, new_quote("B")])
            .await
            .unwrap();
        assert_eq!(inserted, 2);
    }
}
