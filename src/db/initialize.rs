use rusqlite::{Connection, Result};

/// Create the local `history` table if it does not exist yet.
///
/// Same columns as the hosted table. `created_at` is filled by SQLite in
/// UTC, ISO-8601 with milliseconds.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS history (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            duration    NUMERIC NOT NULL,
            tags        TEXT,
            start_time  TEXT,
            end_time    TEXT,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_history_start_time ON history(start_time);
        "#,
    )?;
    Ok(())
}
