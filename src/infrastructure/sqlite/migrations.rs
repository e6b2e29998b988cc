use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS markets (
            source TEXT NOT NULL,
            identifier TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            yes_price REAL NOT NULL DEFAULT 0,
            no_price REAL NOT NULL DEFAULT 0,
            volume REAL NOT NULL DEFAULT 0,
            volume_24h REAL NOT NULL DEFAULT 0,
            close_time TEXT,
            last_updated TEXT NOT NULL,
            PRIMARY KEY (source, identifier)
        );

        CREATE TABLE IF NOT EXISTS duplicate_links (
            id TEXT PRIMARY KEY,
            kalshi_id TEXT NOT NULL,
            polymarket_id TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_markets_source ON markets(source);
        CREATE INDEX IF NOT EXISTS idx_markets_updated ON markets(last_updated);
        CREATE INDEX IF NOT EXISTS idx_links_created ON duplicate_links(created_at);
        ",
    )
    .map_err(|e| format!("Migration failed: {e}"))
}
