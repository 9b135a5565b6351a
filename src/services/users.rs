use crate::config::Config;
use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::{NewUser, User};

pub async fn add_user(repo: &Repository, name: &str, config: &Config) -> Result<User> {
    let user = repo.create_user(NewUser::named(name)).await?;
    repo.seed_default_routines(&user.id, &config.default_routines)
        .await?;
    repo.set_active_user_id(&user.id).await?;
    tracing::info!("Added user {:?} ({})", user.name, user.id);
    Ok(user)
}

pub async fn switch_user(repo: &Repository, user_id: &str) -> Result<User> {
    let user = repo
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;
    repo.set_active_user_id(&user.id).await?;
    Ok(user)
}

/// The active user. Falls back to the oldest user when the stored id is
/// stale, and creates one from the config on a fresh database.
pub async fn ensure_active_user(repo: &Repository, config: &Config) -> Result<User> {
    if let Some(id) = repo.get_active_user_id().await? {
        if let Some(user) = repo.get_user(&id).await? {
            return Ok(user);
        }
        tracing::warn!("Active user {} no longer exists", id);
    }

    match repo.get_all_users().await?.into_iter().next() {
        Some(user) => {
            repo.set_active_user_id(&user.id).await?;
            Ok(user)
        }
        None => add_user(repo, &config.user_name, config).await,
    }
}
