use rusqlite::{params, OptionalExtension};

use crate::error::Result;

use super::repository::Repository;

pub(super) const ACTIVE_USER_KEY: &str = "active_user_id";
const TUTORIAL_KEY: &str = "tutorial_completed";
const MILESTONE_PREFIX: &str = "quote_milestone_celebrated";

fn milestone_key(user_id: &str) -> String {
    format!("{}:{}", MILESTONE_PREFIX, user_id)
}

impl Repository {
    // Raw key/value access

    pub async fn get_preference(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        let value = self
            .conn
            .call(move |conn| {
                let value = conn
                    .query_row(
                        "SELECT value FROM preferences WHERE key = ?1",
                        params![key],
                        |row| row.get::<_, String>(0),
                    )
                    .optional()?;
                Ok(value)
            })
            .await?;
        Ok(value)
    }

    pub async fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO preferences (key, value) VALUES (?1, ?2)
                       ON CONFLICT(key) DO UPDATE SET value = excluded.value"#,
                    params![key, value],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn delete_preference(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM preferences WHERE key = ?1", params![key])?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    // Typed flags

    pub async fn get_active_user_id(&self) -> Result<Option<String>> {
        self.get_preference(ACTIVE_USER_KEY).await
    }

    pub async fn set_active_user_id(&self, user_id: &str) -> Result<()> {
        self.set_preference(ACTIVE_USER_KEY, user_id).await
    }

    pub async fn is_tutorial_completed(&self) -> Result<bool> {
        Ok(self.get_preference(TUTORIAL_KEY).await?.as_deref() == Some("true"))
    }

    pub async fn set_tutorial_completed(&self) -> Result<()> {
        self.set_preference(TUTORIAL_KEY, "true").await
    }

    pub async fn is_milestone_celebrated(&self, user_id: &str) -> Result<bool> {
        Ok(self.get_preference(&milestone_key(user_id)).await?.as_deref() == Some("true"))
    }

    pub async fn set_milestone_celebrated(&self, user_id: &str) -> Result<()> {
        self.set_preference(&milestone_key(user_id), "true").await
    }
}

#[cfg(test)]
mod tests {
    use super::super::repository::test_support::*;

    #[tokio::test]
    async fn test_preference_set_overwrites_and_deletes() {
        let repo = repo().await;
        assert_eq!(repo.get_preference("theme").await.unwrap(), None);

        repo.set_preference("theme", "dawn").await.unwrap();
        repo.set_preference("theme", "dusk").await.unwrap();
        assert_eq!(repo.get_preference("theme").await.unwrap().as_deref(), Some("dusk"));

        repo.delete_preference("theme").await.unwrap();
        assert_eq!(repo.get_preference("theme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_flags_default_to_false() {
        let repo = repo().await;
        assert!(!repo.is_tutorial_completed().await.unwrap());
        assert!(!repo.is_milestone_celebrated("u1").await.unwrap());

        repo.set_tutorial_completed().await.unwrap();
        repo.set_milestone_celebrated("u1").await.unwrap();

        assert!(repo.is_tutorial_completed().await.unwrap());
        assert!(repo.is_milestone_celebrated("u1").await.unwrap());
        assert!(!repo.is_milestone_celebrated("u2").await.unwrap());
    }
}
