use crate::domain::entities::market::Market;
use crate::domain::error::DomainError;
use crate::domain::ports::market_repository::{MarketRepository, MarketStats};
use crate::domain::values::source::Source;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::Mutex;

/// Column list used in all SELECT queries.
const SELECT_COLS: &str =
    "source, identifier, title, description, yes_price, no_price, volume, volume_24h, close_time";

pub struct SqliteMarketRepo {
    conn: Mutex<Connection>,
}

impl SqliteMarketRepo {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn row_to_market(row: &rusqlite::Row) -> Result<Market, rusqlite::Error> {
        let source_str: String = row.get(0)?;
        let close_str: Option<String> = row.get(8)?;

        Ok(Market {
            source: source_str
                .parse()
                .unwrap_or_else(|_| Source::Other(source_str.clone())),
            identifier: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            yes_price: row.get(4)?,
            no_price: row.get(5)?,
            volume: row.get(6)?,
            volume_24h: row.get(7)?,
            close_time: close_str.and_then(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .ok()
            }),
        })
    }
}

impl MarketRepository for SqliteMarketRepo {
    fn upsert(&self, markets: &[Market]) -> Result<(), DomainError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let tx = conn
            .transaction()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let now = Utc::now().to_rfc3339();

        for market in markets {
            tx.execute(
                "INSERT OR REPLACE INTO markets
                 (source, identifier, title, description, yes_price, no_price, volume, volume_24h, close_time, last_updated)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    market.source.to_string(),
                    market.identifier,
                    market.title,
                    market.description,
                    market.yes_price,
                    market.no_price,
                    market.volume,
                    market.volume_24h,
                    market.close_time.map(|t| t.to_rfc3339()),
                    now,
                ],
            )
            .map_err(|e| DomainError::Database(format!("Failed to upsert market: {e}")))?;
        }

        tx.commit()
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    fn all(&self) -> Result<Vec<Market>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let sql = format!("SELECT {SELECT_COLS} FROM markets ORDER BY source, identifier");
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let markets = stmt
            .query_map([], Self::row_to_market)
            .map_err(|e| DomainError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(markets)
    }

    fn updated_since(&self, source: &Source, since: DateTime<Utc>) -> Result<usize, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let count: usize = conn
            .query_row(
                "SELECT COUNT(*) FROM markets WHERE source = ?1 AND last_updated >= ?2",
                params![source.to_string(), since.to_rfc3339()],
                |r| r.get(0),
            )
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(count)
    }

    fn display_name(
        &self,
        source: &Source,
        identifier: &str,
    ) -> Result<Option<String>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut stmt = conn
            .prepare("SELECT title FROM markets WHERE source = ?1 AND identifier = ?2")
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut rows = stmt
            .query_map(params![source.to_string(), identifier], |r| {
                r.get::<_, String>(0)
            })
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(rows.next().and_then(|r| r.ok()))
    }

    fn stats(&self) -> Result<MarketStats, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let total: usize = conn
            .query_row("SELECT COUNT(*) FROM markets", [], |r| r.get(0))
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare("SELECT source, COUNT(*) FROM markets GROUP BY source ORDER BY source")
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let by_source: Vec<(String, usize)> = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, usize>(1)?))
            })
            .map_err(|e| DomainError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(MarketStats {
            total_markets: total,
            by_source,
        })
    }
}
