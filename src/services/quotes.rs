use std::future::Future;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;

use crate::db::Repository;
use crate::error::Result;
use crate::models::{NewQuote, Quote};

/// Viewed-quote count that unlocks the one-time celebration.
pub const QUOTE_MILESTONE: u32 = 50;

const VIEW_RECORD_ATTEMPTS: u32 = 3;
const VIEW_RECORD_DELAY: Duration = Duration::from_millis(500);

const DAILY_QUOTE_PREFIX: &str = "daily_quote";

fn daily_quote_key(user_id: &str) -> String {
    format!("{}:{}", DAILY_QUOTE_PREFIX, user_id)
}

/// The quote for `today`. The first call of a day picks an unviewed quote
/// and records the view; later calls that day return the same quote.
/// Never fails: any error yields [`Quote::fallback`].
pub async fn todays_quote(repo: &Repository, user_id: &str, today: NaiveDate) -> Quote {
    match pick_todays_quote(repo, user_id, today).await {
        Ok(Some(quote)) => quote,
        Ok(None) => {
            tracing::warn!("No quotes available, showing fallback");
            Quote::fallback()
        }
        Err(e) => {
            tracing::error!("Failed to load today's quote: {}", e);
            Quote::fallback()
        }
    }
}

async fn pick_todays_quote(
    repo: &Repository,
    user_id: &str,
    today: NaiveDate,
) -> Result<Option<Quote>> {
    let key = daily_quote_key(user_id);
    let today_str = today.to_string();

    if let Some(stored) = repo.get_preference(&key).await? {
        if let Some((date, quote_id)) = stored.split_once('|') {
            if date == today_str {
                if let Some(quote) = repo.get_quote(quote_id).await? {
                    return Ok(Some(quote));
                }
            }
        }
    }

    let Some(quote) = repo.get_unviewed_random_quote(user_id).await? else {
        return Ok(None);
    };
    repo.set_preference(&key, &format!("{}|{}", today_str, quote.id))
        .await?;
    record_viewed_quote(repo, user_id, &quote.id).await;
    Ok(Some(quote))
}

pub async fn retry_fixed<T, F, Fut>(attempts: u32, delay: Duration, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                tracing::debug!("Attempt {}/{} failed: {}", attempt, attempts, e);
                attempt += 1;
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Record a view, retrying transient failures. Returns whether a new row was written.
pub async fn record_viewed_quote(repo: &Repository, user_id: &str, quote_id: &str) -> bool {
    let result = retry_fixed(VIEW_RECORD_ATTEMPTS, VIEW_RECORD_DELAY, || {
        repo.add_viewed_quote(user_id, quote_id)
    })
    .await;

    match result {
        Ok(inserted) => inserted,
        Err(e) => {
            tracing::error!("Failed to record viewed quote {}: {}", quote_id, e);
            false
        }
    }
}

/// True exactly once per user: the first time their viewed count reaches
/// [`QUOTE_MILESTONE`].
pub async fn check_quote_milestone(repo: &Repository, user_id: &str) -> bool {
    let result: Result<bool> = async {
        if repo.is_milestone_celebrated(user_id).await? {
            return Ok(false);
        }
        if repo.count_viewed_quotes(user_id).await? < QUOTE_MILESTONE {
            return Ok(false);
        }
        repo.set_milestone_celebrated(user_id).await?;
        Ok(true)
    }
    .await;

    result.unwrap_or_else(|e| {
        tracing::warn!("Milestone check failed: {}", e);
        false
    })
}

pub async fn favorite_quotes(repo: &Repository, user_id: &str) -> Vec<Quote> {
    repo.get_favorite_quotes(user_id).await.unwrap_or_else(|e| {
        tracing::warn!("Failed to load favorites: {}", e);
        Vec::new()
    })
}

pub async fn is_favorite(repo: &Repository, user_id: &str, quote: &Quote) -> bool {
    if quote.is_fallback() {
        return false;
    }
    repo.is_favorite_quote(user_id, &quote.id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to read favorite state: {}", e);
            false
        })
}

pub async fn import_quotes(repo: &Repository, path: &Path) -> Result<usize> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let quotes: Vec<NewQuote> = serde_json::from_str(&content)?;
    let total = quotes.len();
    let inserted = repo.insert_quotes(quotes).await?;
    tracing::info!("Imported {}/{} quotes from {:?}", inserted, total, path);
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::error::AppError;
    use crate::models::NewUser;

    async fn setup() -> (Repository, String) {
        let repo = Repository::in_memory().await.unwrap();
        let user = repo.create_user(NewUser::named("Mina")).await.unwrap();
        (repo, user.id)
    }

    fn quote_for(n: usize) -> NewQuote {
        NewQuote {
            text_ko: String::new(),
            text_en: format!("Quote number {}", n),
            author: "Tester".to_string(),
            era: None,
            image_url: None,
            is_published: true,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    #[tokio::test]
    async fn test_todays_quote_is_stable_within_a_day() {
        let (repo, user) = setup().await;
        repo.insert_quotes((0..5).map(quote_for).collect()).await.unwrap();

        let first = todays_quote(&repo, &user, day(1)).await;
        let again = todays_quote(&repo, &user, day(1)).await;
        assert!(!first.is_fallback());
        assert_eq!(first.id, again.id);
        assert_eq!(repo.count_viewed_quotes(&user).await.unwrap(), 1);

        let next_day = todays_quote(&repo, &user, day(2)).await;
        assert_ne!(next_day.id, first.id);
        assert_eq!(repo.count_viewed_quotes(&user).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_todays_quote_falls_back_without_quotes() {
        let (repo, user) = setup().await;
        let quote = todays_quote(&repo, &user, day(1)).await;
        assert!(quote.is_fallback());
        assert!(!is_favorite(&repo, &user, &quote).await);
    }

    #[tokio::test]
    async fn test_retry_fixed_recovers_after_failures() {
        let calls = AtomicU32::new(0);
        let result = retry_fixed(3, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(AppError::InvalidInput("busy".to_string()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(tokio_test::assert_ok!(result), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_fixed_gives_up_after_limit() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_fixed(3, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AppError::InvalidInput("still busy".to_string())) }
        })
        .await;

        tokio_test::assert_err!(result);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_milestone_fires_once_at_threshold() {
        let (repo, user) = setup().await;
        repo.insert_quotes((0..QUOTE_MILESTONE as usize).map(quote_for).collect())
            .await
            .unwrap();
        let quotes = repo.get_all_quotes().await.unwrap();

        for quote in &quotes[..QUOTE_MILESTONE as usize - 1] {
            record_viewed_quote(&repo, &user, &quote.id).await;
        }
        assert!(!check_quote_milestone(&repo, &user).await);

        record_viewed_quote(&repo, &user, &quotes[QUOTE_MILESTONE as usize - 1].id).await;
        assert!(check_quote_milestone(&repo, &user).await);
        assert!(!check_quote_milestone(&repo, &user).await);
    }

    #[tokio::test]
    async fn test_import_quotes_from_json() {
        let (repo, _) = setup().await;
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("quotes.json");
        std::fs::write(
            &path,
            r#"[
                {"text_ko": "시작이 반이다.", "text_en": "Well begun is half done.", "author": "Aristotle"},
                {"text_en": "Hidden draft", "author": "Anon", "published": false},
                {"text_en": "", "author": "Nobody"}
            ]"#,
        )
        .unwrap();

        let inserted = import_quotes(&repo, &path).await.unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(repo.get_published_quotes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_import_rejects_malformed_file() {
        let (repo, _) = setup().await;
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("quotes.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            import_quotes(&repo, &path).await.unwrap_err(),
            AppError::Json(_)
        ));
    }

    #[tokio::test]
    async fn test_import_missing_file_names_path() {
        let (repo, _) = setup().await;
        let err = import_quotes(&repo, Path::new("/nonexistent/quotes.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Other(_)));
        assert!(err.to_string().contains("quotes.json"));
    }

    #[tokio::test]
    async fn test_bundled_quotes_reach_milestone_over_daily_use() {
        let (repo, user) = setup().await;
        repo.seed_quotes_if_empty().await.unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

        for offset in 0..QUOTE_MILESTONE as i64 {
            let quote = todays_quote(&repo, &user, start + chrono::Duration::days(offset)).await;
            assert!(!quote.is_fallback());
        }

        assert_eq!(repo.count_viewed_quotes(&user).await.unwrap(), QUOTE_MILESTONE);
        assert!(check_quote_milestone(&repo, &user).await);
    }

    #[tokio::test]
    async fn test_record_viewed_quote_gives_up_when_store_is_broken() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("hugmi.db");
        let repo = Repository::new(path.to_str().unwrap()).await.unwrap();
        let user = repo.create_user(NewUser::named("Mina")).await.unwrap();
        let quote = repo.create_quote(quote_for(1)).await.unwrap();

        rusqlite::Connection::open(&path)
            .unwrap()
            .execute_batch("DROP TABLE viewed_quotes")
            .unwrap();

        assert!(!record_viewed_quote(&repo, &user.id, &quote.id).await);
    }
}
