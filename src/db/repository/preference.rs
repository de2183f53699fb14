use rusqlite::{params, Connection};

use crate::config::{PREFERRED_CITY_KEY, SESSION_TOKEN_KEY};
use crate::db::DatabaseError;

/// Get a user preference by key. Returns None if not set.
pub fn get_user_preference(
    conn: &Connection,
    key: &str,
) -> Result<Option<String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT value FROM user_preferences WHERE key = ?1")?;
    match stmt.query_row([key], |row| row.get::<_, String>(0)) {
        Ok(val) => Ok(Some(val)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

/// Set a user preference (upsert).
pub fn set_user_preference(
    conn: &Connection,
    key: &str,
    value: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO user_preferences (key, value, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
        params![key, value],
    )?;
    Ok(())
}

/// Preferred dateline city. Blank values count as unset.
pub fn get_preferred_city(conn: &Connection) -> Result<Option<String>, DatabaseError> {
    Ok(get_user_preference(conn, PREFERRED_CITY_KEY)?
        .map(|city| city.trim().to_string())
        .filter(|city| !city.is_empty()))
}

/// Access token persisted by the external auth provider, if any.
pub fn get_session_token(conn: &Connection) -> Result<Option<String>, DatabaseError> {
    Ok(get_user_preference(conn, SESSION_TOKEN_KEY)?.filter(|token| !token.is_empty()))
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn setup_db() -> Connection {
        open_memory_database().expect("in-memory DB should open")
    }

    #[test]
    fn missing_preference_is_none() {
        let conn = setup_db();
        assert_eq!(get_user_preference(&conn, "nope").unwrap(), None);
    }

    #[test]
    fn set_then_get_preference() {
        let conn = setup_db();
        set_user_preference(&conn, "theme", "dark").unwrap();
        assert_eq!(
            get_user_preference(&conn, "theme").unwrap().as_deref(),
            Some("dark")
        );
    }

    #[test]
    fn set_overwrites_existing_value() {
        let conn = setup_db();
        set_user_preference(&conn, PREFERRED_CITY_KEY, "Campinas").unwrap();
        set_user_preference(&conn, PREFERRED_CITY_KEY, "Santos").unwrap();
        assert_eq!(get_preferred_city(&conn).unwrap().as_deref(), Some("Santos"));
    }

    #[test]
    fn blank_city_is_treated_as_unset() {
        let conn = setup_db();
        set_user_preference(&conn, PREFERRED_CITY_KEY, "   ").unwrap();
        assert_eq!(get_preferred_city(&conn).unwrap(), None);
    }

    #[test]
    fn session_token_round_trip() {
        let conn = setup_db();
        assert_eq!(get_session_token(&conn).unwrap(), None);
        set_user_preference(&conn, SESSION_TOKEN_KEY, "jwt-abc").unwrap();
        assert_eq!(get_session_token(&conn).unwrap().as_deref(), Some("jwt-abc"));
    }
}
