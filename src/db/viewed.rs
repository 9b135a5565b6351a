use rusqlite::params;

use crate::error::Result;

use super::repository::{new_id, Repository};

impl Repository {
    pub async fn has_viewed_quote(&self, user_id: &str, quote_id: &str) -> Result<bool> {
        let user = user_id.to_string();
        let quote = quote_id.to_string();
        let exists = self
            .conn
            .call(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM viewed_quotes WHERE user_id = ?1 AND quote_id = ?2",
                    params![user, quote],
                    |row| row.get(0),
                )?;
                Ok(count > 0)
            })
            .await?;
        Ok(exists)
    }

    /// Record that the user saw a quote, unless they already had.
    /// Returns `true` when a row was written.
    pub async fn add_viewed_quote(&self, user_id: &str, quote_id: &str) -> Result<bool> {
        let user = user_id.to_string();
        let quote = quote_id.to_string();
        let inserted = self
            .conn
            .call(move |conn| {
                let inserted = conn.execute(
                    r#"INSERT INTO viewed_quotes (id, user_id, quote_id)
                       SELECT ?1, ?2, ?3
                       WHERE NOT EXISTS (
                           SELECT 1 FROM viewed_quotes WHERE user_id = ?2 AND quote_id = ?3
                       )"#,
                    params![new_id(), user, quote],
                )?;
                Ok(inserted > 0)
            })
            .await?;
        Ok(inserted)
    }

    #[cfg(test)]
    pub async fn add_viewed_quote_unchecked(&self, user_id: &str, quote_id: &str) -> Result<()> {
        let user = user_id.to_string();
        let quote = quote_id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO viewed_quotes (id, user_id, quote_id) VALUES (?1, ?2, ?3)",
                    params![new_id(), user, quote],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn get_viewed_quote_ids(&self, user_id: &str) -> Result<Vec<String>> {
        let user = user_id.to_string();
        let ids = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT DISTINCT quote_id FROM viewed_quotes WHERE user_id = ?1 ORDER BY quote_id",
                )?;
                let ids = stmt
                    .query_map(params![user], |row| row.get::<_, String>(0))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(ids)
            })
            .await?;
        Ok(ids)
    }

    pub async fn count_viewed_quotes(&self, user_id: &str) -> Result<u32> {
        let user = user_id.to_string();
        let count = self
            .conn
            .call(move |conn| {
                let count: u32 = conn.query_row(
                    "SELECT COUNT(DISTINCT quote_id) FROM viewed_quotes WHERE user_id = ?1",
                    params![user],
                    |row| row.get(0),
                )?;
                Ok(count)
            })
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::super::repository::test_support::*;

    #[tokio::test]
    async fn test_add_viewed_quote_dedups() {
        let repo = repo().await;
        let user = user(&repo, "Mina").await;
        let q = quote(&repo, "Seneca").await;

        assert!(!repo.has_viewed_quote(&user.id, &q.id).await.unwrap());
        assert!(repo.add_viewed_quote(&user.id, &q.id).await.unwrap());
        assert!(!repo.add_viewed_quote(&user.id, &q.id).await.unwrap());
        assert!(repo.has_viewed_quote(&user.id, &q.id).await.unwrap());
        assert_eq!(repo.count_viewed_quotes(&user.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unchecked_append_keeps_distinct_count() {
        let repo = repo().await;
        let user = user(&repo, "Mina").await;
        let a = quote(&repo, "A").await;
        let b = quote(&repo, "B").await;

        repo.add_viewed_quote_unchecked(&user.id, &a.id).await.unwrap();
        repo.add_viewed_quote_unchecked(&user.id, &a.id).await.unwrap();
        repo.add_viewed_quote_unchecked(&user.id, &b.id).await.unwrap();

        assert_eq!(repo.count_viewed_quotes(&user.id).await.unwrap(), 2);
        let mut expected = vec![a.id, b.id];
        expected.sort();
        assert_eq!(repo.get_viewed_quote_ids(&user.id).await.unwrap(), expected);
    }
}
