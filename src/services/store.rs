use crate::config::Config;
use crate::db::Repository;
use crate::error::Result;

/// Open the configured database and seed the bundled quotes on first use.
pub async fn open(config: &Config) -> Result<Repository> {
    let repository = Repository::new(&config.db_path).await?;

    if config.seed_quotes {
        if let Err(e) = repository.seed_quotes_if_empty().await {
            tracing::warn!("Failed to seed quotes: {}", e);
        }
    }

    Ok(repository)
}
