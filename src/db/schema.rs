use rusqlite::Connection;

pub const SCHEMA: &str = r#"
-- users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    routine_start_time TEXT NOT NULL DEFAULT '07:00',
    notify_time TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- quotes table
CREATE TABLE IF NOT EXISTS quotes (
    id TEXT PRIMARY KEY,
    text_ko TEXT NOT NULL DEFAULT '',
    text_en TEXT NOT NULL DEFAULT '',
    author TEXT NOT NULL,
    era TEXT,
    image_url TEXT,
    is_published INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- routines table
CREATE TABLE IF NOT EXISTS routines (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    sort_order INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_routines_user_order ON routines(user_id, sort_order);

-- routine_logs table (one row per routine per day)
CREATE TABLE IF NOT EXISTS routine_logs (
    id TEXT PRIMARY KEY,
    routine_id TEXT NOT NULL REFERENCES routines(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    log_date TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('checked', 'skipped')),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(routine_id, log_date)
);

CREATE INDEX IF NOT EXISTS idx_routine_logs_user_date ON routine_logs(user_id, log_date);

-- mood_logs table (one row per user per day)
CREATE TABLE IF NOT EXISTS mood_logs (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    log_date TEXT NOT NULL,
    mood TEXT NOT NULL,
    quote_id TEXT REFERENCES quotes(id) ON DELETE SET NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(user_id, log_date)
);

-- favorite_quotes table
CREATE TABLE IF NOT EXISTS favorite_quotes (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    quote_id TEXT NOT NULL REFERENCES quotes(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(user_id, quote_id)
);

-- viewed_quotes table (append-only history of shown quotes)
CREATE TABLE IF NOT EXISTS viewed_quotes (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    quote_id TEXT NOT NULL REFERENCES quotes(id) ON DELETE CASCADE,
    viewed_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_viewed_quotes_user ON viewed_quotes(user_id, quote_id);

-- preferences table (active user, tutorial flag, milestone flags)
CREATE TABLE IF NOT EXISTS preferences (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

pub const ALL_TABLES: [&str; 8] = [
    "routine_logs",
    "mood_logs",
    "favorite_quotes",
    "viewed_quotes",
    "routines",
    "quotes",
    "users",
    "preferences",
];

pub fn column_exists(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names.iter().any(|name| name == column))
}

/// Columns added after the first release. Databases created before then
/// lack them, and `CREATE TABLE IF NOT EXISTS` leaves old tables untouched.
pub fn upgrade_legacy_columns(conn: &Connection) -> rusqlite::Result<()> {
    if !column_exists(conn, "quotes", "is_published")? {
        tracing::info!("Adding quotes.is_published to legacy database");
        conn.execute(
            "ALTER TABLE quotes ADD COLUMN is_published INTEGER NOT NULL DEFAULT 1",
            [],
        )?;
    }
    Ok(())
}
