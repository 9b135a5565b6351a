mod favorites;
mod moods;
mod preferences;
mod quotes;
mod repository;
mod routine_logs;
mod routines;
mod schema;
pub(crate) mod seed;
mod users;
mod viewed;

pub use repository::Repository;
