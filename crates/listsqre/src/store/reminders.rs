use super::db::Database;
use crate::error::Result;
use crate::model::Reminder;
use rusqlite::{params, OptionalExtension, Row};

const REMINDER_COLUMNS: &str = "id, uniqueId, description, notifyAt";

/// Stored reminders. Nothing here fires them; delivery belongs to whatever UI
/// reads the list.
pub struct ReminderStore {
    db: Database,
}

impl ReminderStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Stores a reminder. An existing reminder with the same `unique_id` is
    /// replaced.
    pub fn insert_reminder(
        &self,
        unique_id: i64,
        description: &str,
        notify_at: i64,
    ) -> Result<Reminder> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO reminders (uniqueId, description, notifyAt)
                 VALUES (?1, ?2, ?3)",
                params![unique_id, description, notify_at],
            )?;
            Ok(Reminder {
                id: conn.last_insert_rowid(),
                unique_id,
                description: description.to_string(),
                notify_at,
            })
        })
    }

    pub fn get_by_unique_id(&self, unique_id: i64) -> Result<Option<Reminder>> {
        self.db.with_conn(|conn| {
            Ok(conn
                .query_row(
                    &format!(
                        "SELECT {} FROM reminders WHERE uniqueId = ?1",
                        REMINDER_COLUMNS
                    ),
                    params![unique_id],
                    reminder_from_row,
                )
                .optional()?)
        })
    }

    /// Latest first.
    pub fn list_reminders(&self) -> Result<Vec<Reminder>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM reminders ORDER BY notifyAt DESC",
                REMINDER_COLUMNS
            ))?;
            let rows = stmt.query_map([], reminder_from_row)?;
            let mut reminders = Vec::new();
            for row in rows {
                reminders.push(row?);
            }
            Ok(reminders)
        })
    }

    pub fn delete_reminder(&self, id: i64) -> Result<bool> {
        let changed = self.db.with_conn(|conn| {
            Ok(conn.execute("DELETE FROM reminders WHERE id = ?1", params![id])?)
        })?;
        Ok(changed > 0)
    }

    pub fn delete_reminder_by_unique_id(&self, unique_id: i64) -> Result<bool> {
        let changed = self.db.with_conn(|conn| {
            Ok(conn.execute(
                "DELETE FROM reminders WHERE uniqueId = ?1",
                params![unique_id],
            )?)
        })?;
        Ok(changed > 0)
    }
}

fn reminder_from_row(row: &Row<'_>) -> rusqlite::Result<Reminder> {
    Ok(Reminder {
        id: row.get(0)?,
        unique_id: row.get(1)?,
        description: row.get(2)?,
        notify_at: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> ReminderStore {
        ReminderStore::new(Database::open_in_memory().unwrap())
    }

    #[test]
    fn list_is_latest_first() {
        let store = make_store();
        store.insert_reminder(1, "early", 1_000).unwrap();
        store.insert_reminder(2, "late", 5_000).unwrap();

        let descriptions: Vec<_> = store
            .list_reminders()
            .unwrap()
            .into_iter()
            .map(|r| r.description)
            .collect();
        assert_eq!(descriptions, vec!["late", "early"]);
    }

    #[test]
    fn same_unique_id_replaces() {
        let store = make_store();
        store.insert_reminder(7, "first", 1_000).unwrap();
        let second = store.insert_reminder(7, "second", 2_000).unwrap();

        let all = store.list_reminders().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], second);
        assert_eq!(
            store.get_by_unique_id(7).unwrap().unwrap().description,
            "second"
        );
    }

    #[test]
    fn delete_by_either_key() {
        let store = make_store();
        let a = store.insert_reminder(1, "a", 1).unwrap();
        store.insert_reminder(2, "b", 2).unwrap();

        assert!(store.delete_reminder(a.id).unwrap());
        assert!(!store.delete_reminder(a.id).unwrap());
        assert!(store.delete_reminder_by_unique_id(2).unwrap());
        assert!(store.list_reminders().unwrap().is_empty());
    }
}
