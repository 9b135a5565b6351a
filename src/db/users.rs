use rusqlite::{params, OptionalExtension, Row};

use crate::error::{AppError, Result};
use crate::models::{format_time, parse_time, NewUser, User, UserUpdate};

use super::preferences::ACTIVE_USER_KEY;
use super::repository::{conversion_error, datetime_column, new_id, Repository};

const USER_COLUMNS: &str = "id, name, routine_start_time, notify_time, created_at, updated_at";

impl Repository {
    pub async fn create_user(&self, user: NewUser) -> Result<User> {
        let name = user.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::InvalidInput("user name must not be empty".to_string()));
        }

        let id = new_id();
        let start = format_time(user.routine_start_time);
        let notify = user.notify_time.map(format_time);
        let user_id = id.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO users (id, name, routine_start_time, notify_time) VALUES (?1, ?2, ?3, ?4)",
                    params![user_id, name, start, notify],
                )?;
                Ok(())
            })
            .await?;

        tracing::debug!("Created user {}", id);
        self.get_user(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<User>> {
        let id = id.to_string();
        let user = self
            .conn
            .call(move |conn| {
                let mut stmt =
                    conn.prepare(&format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS))?;
                let user = stmt.query_row(params![id], user_from_row).optional()?;
                Ok(user)
            })
            .await?;
        Ok(user)
    }

    pub async fn get_all_users(&self) -> Result<Vec<User>> {
        let users = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM users ORDER BY created_at, rowid",
                    USER_COLUMNS
                ))?;
                let users = stmt
                    .query_map([], user_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(users)
            })
            .await?;
        Ok(users)
    }

    pub async fn update_user(&self, id: &str, update: UserUpdate) -> Result<User> {
        let current = self
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))?;

        let name = match update.name {
            Some(name) if name.trim().is_empty() => {
                return Err(AppError::InvalidInput("user name must not be empty".to_string()))
            }
            Some(name) => name.trim().to_string(),
            None => current.name,
        };
        let start = format_time(update.routine_start_time.unwrap_or(current.routine_start_time));
        let notify = update
            .notify_time
            .unwrap_or(current.notify_time)
            .map(format_time);

        let user_id = id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"UPDATE users
                       SET name = ?1, routine_start_time = ?2, notify_time = ?3, updated_at = datetime('now')
                       WHERE id = ?4"#,
                    params![name, start, notify, user_id],
                )?;
                Ok(())
            })
            .await?;

        self.get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    pub async fn delete_user(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.conn
            .call(move |conn| {
                // Delete related data first
                conn.execute("DELETE FROM routine_logs WHERE user_id = ?1", params![id])?;
                conn.execute("DELETE FROM routines WHERE user_id = ?1", params![id])?;
                conn.execute("DELETE FROM mood_logs WHERE user_id = ?1", params![id])?;
                conn.execute("DELETE FROM favorite_quotes WHERE user_id = ?1", params![id])?;
                conn.execute("DELETE FROM viewed_quotes WHERE user_id = ?1", params![id])?;
                conn.execute(
                    "DELETE FROM preferences WHERE (key = ?1 AND value = ?2) OR key LIKE ?3",
                    params![ACTIVE_USER_KEY, id, format!("%:{}", id)],
                )?;
                conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    let start: String = row.get(2)?;
    let notify: Option<String> = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        routine_start_time: parse_time(&start).map_err(|e| conversion_error(2, e))?,
        notify_time: notify
            .map(|s| parse_time(&s))
            .transpose()
            .map_err(|e| conversion_error(3, e))?,
        created_at: datetime_column(row, 4)?,
        updated_at: datetime_column(row, 5)?,
    })
}
