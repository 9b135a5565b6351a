use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutineStatus {
    Checked,
    Skipped,
}

impl RoutineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutineStatus::Checked => "checked",
            RoutineStatus::Skipped => "skipped",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "checked" => Ok(RoutineStatus::Checked),
            "skipped" => Ok(RoutineStatus::Skipped),
            other => Err(AppError::InvalidInput(format!("unknown routine status {:?}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineLog {
    pub id: String,
    pub routine_id: String,
    pub user_id: String,
    pub log_date: NaiveDate,
    pub status: RoutineStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCompletion {
    pub date: NaiveDate,
    pub checked: u32,
    pub skipped: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistItem {
    pub routine: Routine,
    pub status: Option<RoutineStatus>,
}

impl ChecklistItem {
    pub fn is_done(&self) -> bool {
        self.status.is_some()
    }
}
