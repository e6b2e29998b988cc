use crate::domain::entities::duplicate_link::DuplicateLink;
use crate::domain::error::DomainError;
use crate::domain::ports::link_repository::LinkRepository;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::Mutex;

pub struct SqliteLinkRepo {
    conn: Mutex<Connection>,
}

impl SqliteLinkRepo {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

impl LinkRepository for SqliteLinkRepo {
    fn record_link(&self, kalshi_id: &str, polymarket_id: &str) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let link = DuplicateLink::new(kalshi_id.to_string(), polymarket_id.to_string());
        conn.execute(
            "INSERT INTO duplicate_links (id, kalshi_id, polymarket_id, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                link.id,
                link.kalshi_id,
                link.polymarket_id,
                link.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| DomainError::Database(format!("Failed to record link: {e}")))?;
        Ok(())
    }

    fn all(&self) -> Result<Vec<DuplicateLink>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut stmt = conn
            .prepare(
                "SELECT id, kalshi_id, polymarket_id, created_at
                 FROM duplicate_links ORDER BY created_at",
            )
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let links = stmt
            .query_map([], |row| {
                let created_str: String = row.get(3)?;
                Ok(DuplicateLink {
                    id: row.get(0)?,
                    kalshi_id: row.get(1)?,
                    polymarket_id: row.get(2)?,
                    created_at: DateTime::parse_from_rfc3339(&created_str)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now()),
                })
            })
            .map_err(|e| DomainError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sqlite::migrations::run_migrations;

    fn repo() -> SqliteLinkRepo {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        SqliteLinkRepo::new(conn)
    }

    #[test]
    fn test_record_and_list_links() {
        let repo = repo();
        repo.record_link("KXBTC-25DEC31", "501234").unwrap();

        let links = repo.all().unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].kalshi_id, "KXBTC-25DEC31");
        assert_eq!(links[0].polymarket_id, "501234");
    }

    #[test]
    fn test_repeated_links_are_not_deduplicated() {
        // record_link makes no idempotence promise: the same pair recorded
        // twice produces two rows.
        let repo = repo();
        repo.record_link("K1", "P1").unwrap();
        repo.record_link("K1", "P1").unwrap();
        assert_eq!(repo.all().unwrap().len(), 2);
    }
}
