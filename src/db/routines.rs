use rusqlite::{params, OptionalExtension, Row};

use crate::error::{AppError, Result};
use crate::models::Routine;

use super::repository::{datetime_column, new_id, Repository};

const ROUTINE_COLUMNS: &str = "id, user_id, title, sort_order, is_active, created_at, updated_at";

fn clean_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("routine title must not be empty".to_string()));
    }
    Ok(title.to_string())
}

impl Repository {
    pub async fn create_routine(&self, user_id: &str, title: &str) -> Result<Routine> {
        let title = clean_title(title)?;
        let id = new_id();
        let routine_id = id.clone();
        let user_id = user_id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO routines (id, user_id, title, sort_order)
                       VALUES (?1, ?2, ?3,
                           (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM routines WHERE user_id = ?2))"#,
                    params![routine_id, user_id, title],
                )?;
                Ok(())
            })
            .await?;

        self.get_routine(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("routine {}", id)))
    }

    pub async fn seed_default_routines(&self, user_id: &str, titles: &[String]) -> Result<Vec<Routine>> {
        let mut routines = Vec::with_capacity(titles.len());
        for title in titles {
            match self.create_routine(user_id, title).await {
                Ok(routine) => routines.push(routine),
                Err(AppError::InvalidInput(msg)) => {
                    tracing::warn!("Skipping default routine {:?}: {}", title, msg);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(routines)
    }

    pub async fn get_routine(&self, id: &str) -> Result<Option<Routine>> {
        let id = id.to_string();
        let routine = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM routines WHERE id = ?1",
                    ROUTINE_COLUMNS
                ))?;
                let routine = stmt.query_row(params![id], routine_from_row).optional()?;
                Ok(routine)
            })
            .await?;
        Ok(routine)
    }

    pub async fn get_routines_by_user(&self, user_id: &str) -> Result<Vec<Routine>> {
        self.query_routines(user_id, false).await
    }

    pub async fn get_active_routines(&self, user_id: &str) -> Result<Vec<Routine>> {
        self.query_routines(user_id, true).await
    }

    async fn query_routines(&self, user_id: &str, active_only: bool) -> Result<Vec<Routine>> {
        let user_id = user_id.to_string();
        let routines = self
            .conn
            .call(move |conn| {
                let filter = if active_only { "AND is_active = 1" } else { "" };
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM routines WHERE user_id = ?1 {} ORDER BY sort_order, created_at",
                    ROUTINE_COLUMNS, filter
                ))?;
                let routines = stmt
                    .query_map(params![user_id], routine_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(routines)
            })
            .await?;
        Ok(routines)
    }

    pub async fn update_routine_title(&self, id: &str, title: &str) -> Result<()> {
        let title = clean_title(title)?;
        let id = id.to_string();
        let changed = self
            .conn
            .call(move |conn| {
                let changed = conn.execute(
                    "UPDATE routines SET title = ?1, updated_at = datetime('now') WHERE id = ?2",
                    params![title, id],
                )?;
                Ok(changed)
            })
            .await?;
        if changed == 0 {
            return Err(AppError::NotFound("routine".to_string()));
        }
        Ok(())
    }

    pub async fn set_routine_active(&self, id: &str, is_active: bool) -> Result<()> {
        let id = id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "UPDATE routines SET is_active = ?1, updated_at = datetime('now') WHERE id = ?2",
                    params![is_active, id],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn delete_routine(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM routine_logs WHERE routine_id = ?1", params![id])?;
                conn.execute("DELETE FROM routines WHERE id = ?1", params![id])?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    /// Rewrite `sort_order` so routines appear in the given order. All ids
    /// must belong to the user; otherwise nothing changes.
    pub async fn reorder_routines(&self, user_id: &str, ordered_ids: &[String]) -> Result<()> {
        let user_id = user_id.to_string();
        let ids = ordered_ids.to_vec();
        let applied = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                for (position, id) in ids.iter().enumerate() {
                    let changed = tx.execute(
                        r#"UPDATE routines SET sort_order = ?1, updated_at = datetime('now')
                           WHERE id = ?2 AND user_id = ?3"#,
                        params![position as i64, id, user_id],
                    )?;
                    if changed == 0 {
                        tx.rollback()?;
                        return Ok(false);
                    }
                }
                tx.commit()?;
                Ok(true)
            })
            .await?;

        if !applied {
            return Err(AppError::InvalidInput(
                "reorder list contains a routine the user does not own".to_string(),
            ));
        }
        Ok(())
    }
}

fn routine_from_row(row: &Row) -> rusqlite::Result<Routine> {
    Ok(Routine {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        sort_order: row.get(3)?,
        is_active: row.get::<_, i64>(4)? != 0,
        created_at: datetime_column(row, 5)?,
        updated_at: datetime_column(row, 6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::super::repository::test_support::*;
    use crate::error::AppError;
    use crate::models::RoutineStatus;

    fn titles(routines: &[crate::models::Routine]) -> Vec<&str> {
        routines.iter().map(|r| r.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_routine_appends_in_order() {
        let repo = repo().await;
        let user = user(&repo, "Mina").await;
        let first = repo.create_routine(&user.id, "Water").await.unwrap();
        let second = repo.create_routine(&user.id, " Stretch ").await.unwrap();

        assert_eq!(first.sort_order, 0);
        assert_eq!(second.sort_order, 1);
        assert_eq!(second.title, "Stretch");
        assert!(second.is_active);

        let routines = repo.get_routines_by_user(&user.id).await.unwrap();
        assert_eq!(titles(&routines), vec!["Water", "Stretch"]);
    }

    #[tokio::test]
    async fn test_sort_order_is_per_user() {
        let repo = repo().await;
        let mina = user(&repo, "Mina").await;
        let jun = user(&repo, "Jun").await;
        repo.create_routine(&mina.id, "Water").await.unwrap();
        repo.create_routine(&mina.id, "Stretch").await.unwrap();

        let juns = repo.create_routine(&jun.id, "Journal").await.unwrap();
        assert_eq!(juns.sort_order, 0);
    }

    #[tokio::test]
    async fn test_blank_title_rejected() {
        let repo = repo().await;
        let user = user(&repo, "Mina").await;
        assert!(matches!(
            repo.create_routine(&user.id, "  ").await.unwrap_err(),
            AppError::InvalidInput(_)
        ));
    }

    #[tokio::test]
    async fn test_active_filter() {
        let repo = repo().await;
        let user = user(&repo, "Mina").await;
        let water = repo.create_routine(&user.id, "Water").await.unwrap();
        repo.create_routine(&user.id, "Stretch").await.unwrap();
        repo.set_routine_active(&water.id, false).await.unwrap();

        let active = repo.get_active_routines(&user.id).await.unwrap();
        assert_eq!(titles(&active), vec!["Stretch"]);
        assert_eq!(repo.get_routines_by_user(&user.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_title() {
        let repo = repo().await;
        let user = user(&repo, "Mina").await;
        let r = repo.create_routine(&user.id, "Water").await.unwrap();
        repo.update_routine_title(&r.id, "Warm water").await.unwrap();
        assert_eq!(repo.get_routine(&r.id).await.unwrap().unwrap().title, "Warm water");

        assert!(matches!(
            repo.update_routine_title("missing", "x").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_reorder_routines() {
        let repo = repo().await;
        let user = user(&repo, "Mina").await;
        let a = repo.create_routine(&user.id, "A").await.unwrap();
        let b = repo.create_routine(&user.id, "B").await.unwrap();
        let c = repo.create_routine(&user.id, "C").await.unwrap();

        repo.reorder_routines(&user.id, &[c.id.clone(), a.id.clone(), b.id.clone()])
            .await
            .unwrap();

        let routines = repo.get_routines_by_user(&user.id).await.unwrap();
        assert_eq!(titles(&routines), vec!["C", "A", "B"]);
        assert_eq!(
            routines.iter().map(|r| r.sort_order).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[tokio::test]
    async fn test_reorder_rolls_back_on_foreign_id() {
        let repo = repo().await;
        let mina = user(&repo, "Mina").await;
        let jun = user(&repo, "Jun").await;
        let a = repo.create_routine(&mina.id, "A").await.unwrap();
        let b = repo.create_routine(&mina.id, "B").await.unwrap();
        let foreign = repo.create_routine(&jun.id, "X").await.unwrap();

        let err = repo
            .reorder_routines(&mina.id, &[b.id.clone(), foreign.id.clone(), a.id.clone()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        // First update was rolled back
        let routines = repo.get_routines_by_user(&mina.id).await.unwrap();
        assert_eq!(titles(&routines), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_delete_routine_removes_logs() {
        let repo = repo().await;
        let user = user(&repo, "Mina").await;
        let r = repo.create_routine(&user.id, "Water").await.unwrap();
        repo.upsert_routine_log(&r.id, &user.id, day(3), RoutineStatus::Checked)
            .await
            .unwrap();

        repo.delete_routine(&r.id).await.unwrap();

        assert!(repo.get_routine(&r.id).await.unwrap().is_none());
        assert!(repo.get_routine_log(&r.id, day(3)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seed_default_routines_skips_blank() {
        let repo = repo().await;
        let user = user(&repo, "Mina").await;
        let seeded = repo
            .seed_default_routines(
                &user.id,
                &["Water".to_string(), "".to_string(), "Stretch".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(titles(&seeded), vec!["Water", "Stretch"]);
    }
}
