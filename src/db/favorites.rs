use rusqlite::params;

use crate::error::Result;
use crate::models::Quote;

use super::quotes::quote_from_row;
use super::repository::{new_id, Repository};

impl Repository {
    pub async fn add_favorite_quote(&self, user_id: &str, quote_id: &str) -> Result<bool> {
        let user = user_id.to_string();
        let quote = quote_id.to_string();
        let inserted = self
            .conn
            .call(move |conn| {
                let inserted = conn.execute(
                    r#"INSERT INTO favorite_quotes (id, user_id, quote_id) VALUES (?1, ?2, ?3)
                       ON CONFLICT(user_id, quote_id) DO NOTHING"#,
                    params![new_id(), user, quote],
                )?;
                Ok(inserted > 0)
            })
            .await?;
        Ok(inserted)
    }

    pub async fn remove_favorite_quote(&self, user_id: &str, quote_id: &str) -> Result<()> {
        let user = user_id.to_string();
        let quote = quote_id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "DELETE FROM favorite_quotes WHERE user_id = ?1 AND quote_id = ?2",
                    params![user, quote],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn is_favorite_quote(&self, user_id: &str, quote_id: &str) -> Result<bool> {
        let user = user_id.to_string();
        let quote = quote_id.to_string();
        let exists = self
            .conn
            .call(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM favorite_quotes WHERE user_id = ?1 AND quote_id = ?2",
                    params![user, quote],
                    |row| row.get(0),
                )?;
                Ok(count > 0)
            })
            .await?;
        Ok(exists)
    }

    pub async fn toggle_favorite_quote(&self, user_id: &str, quote_id: &str) -> Result<bool> {
        if self.is_favorite_quote(user_id, quote_id).await? {
            self.remove_favorite_quote(user_id, quote_id).await?;
            Ok(false)
        } else {
            self.add_favorite_quote(user_id, quote_id).await?;
            Ok(true)
        }
    }

    pub async fn get_favorite_quotes(&self, user_id: &str) -> Result<Vec<Quote>> {
        let user = user_id.to_string();
        let quotes = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT q.id, q.text_ko, q.text_en, q.author, q.era, q.image_url,
                              q.is_published, q.created_at
                       FROM favorite_quotes f
                       JOIN quotes q ON f.quote_id = q.id
                       WHERE f.user_id = ?1
                       ORDER BY f.created_at DESC, f.rowid DESC"#,
                )?;
                let quotes = stmt
                    .query_map(params![user], quote_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(quotes)
            })
            .await?;
        Ok(quotes)
    }
}
