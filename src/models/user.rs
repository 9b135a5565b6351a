use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub routine_start_time: NaiveTime,
    pub notify_time: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub routine_start_time: NaiveTime,
    pub notify_time: Option<NaiveTime>,
}

impl NewUser {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            routine_start_time: default_routine_start(),
            notify_time: None,
        }
    }
}

/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub routine_start_time: Option<NaiveTime>,
    pub notify_time: Option<Option<NaiveTime>>,
}

pub fn default_routine_start() -> NaiveTime {
    NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN)
}

pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
        .map_err(|_| AppError::InvalidInput(format!("expected HH:MM, got {:?}", s)))
}

pub fn format_time(t: NaiveTime) -> String {
    t.format(TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_accepts_hh_mm() {
        let t = parse_time("06:30").unwrap();
        assert_eq!(format_time(t), "06:30");
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        assert!(matches!(parse_time("6.30am"), Err(AppError::InvalidInput(_))));
        assert!(parse_time("25:00").is_err());
    }
}
