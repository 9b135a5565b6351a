use chrono::NaiveDate;

use crate::db::Repository;
use crate::error::Result;
use crate::models::{ChecklistItem, Routine, RoutineStatus};

/// Today's checklist: the user's active routines with whatever status
/// they already have for `date`. Empty on failure.
pub async fn todays_checklist(repo: &Repository, user_id: &str, date: NaiveDate) -> Vec<ChecklistItem> {
    match load_checklist(repo, user_id, date).await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!("Failed to load checklist: {}", e);
            Vec::new()
        }
    }
}

async fn load_checklist(repo: &Repository, user_id: &str, date: NaiveDate) -> Result<Vec<ChecklistItem>> {
    let routines = repo.get_active_routines(user_id).await?;
    let logs = repo.get_routine_logs_by_date(user_id, date).await?;

    Ok(routines
        .into_iter()
        .map(|routine| {
            let status = logs
                .iter()
                .find(|log| log.routine_id == routine.id)
                .map(|log| log.status);
            ChecklistItem { routine, status }
        })
        .collect())
}

pub async fn set_routine_status(
    repo: &Repository,
    routine: &Routine,
    date: NaiveDate,
    status: Option<RoutineStatus>,
) -> bool {
    let result = match status {
        Some(status) => repo
            .upsert_routine_log(&routine.id, &routine.user_id, date, status)
            .await
            .map(|_| ()),
        None => repo.delete_routine_log(&routine.id, date).await,
    };

    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Failed to update routine {:?}: {}", routine.title, e);
            false
        }
    }
}

/// Swap the routine at `index` with its neighbour (`up` towards the top)
/// and persist the new order. Returns the index the routine moved to.
pub async fn move_routine(
    repo: &Repository,
    user_id: &str,
    routines: &[Routine],
    index: usize,
    up: bool,
) -> Option<usize> {
    let target = if up {
        index.checked_sub(1)?
    } else {
        let next = index + 1;
        if next >= routines.len() {
            return None;
        }
        next
    };

    let mut ids: Vec<String> = routines.iter().map(|r| r.id.clone()).collect();
    ids.swap(index, target);

    match repo.reorder_routines(user_id, &ids).await {
        Ok(()) => Some(target),
        Err(e) => {
            tracing::error!("Failed to reorder routines: {}", e);
            None
        }
    }
}

pub fn progress(items: &[ChecklistItem]) -> (usize, usize) {
    (items.iter().filter(|i| i.is_done()).count(), items.len())
}
