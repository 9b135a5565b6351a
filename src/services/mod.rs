//! Per-entity helpers on top of [`Repository`](crate::db::Repository).
//!
//! The repository propagates every error. These helpers are what the UI
//! calls: they log failures and hand back fallback content so a broken
//! database never blanks the morning screen.

pub mod backup;
pub mod quotes;
pub mod routines;
pub mod store;
pub mod users;
