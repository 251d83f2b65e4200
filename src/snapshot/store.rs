//! Read-only query engine over the decompressed SQLite snapshot.

use std::io::Write;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OpenFlags, Row, Statement};
use tempfile::NamedTempFile;

use crate::error::Result;
use serde_json::Value;

use crate::note::NoteRecord;

const NOTES_BY_CHARACTER: &str = "SELECT characterId, noteId, createdAt, metadata \
     FROM notes WHERE characterId = ?1 ORDER BY createdAt DESC";

/// A loaded snapshot. The database image lives in a private temporary file
/// that is removed when the handle is dropped.
pub struct SnapshotDb {
    conn: Mutex<Connection>,
    _image: NamedTempFile,
}

impl std::fmt::Debug for SnapshotDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotDb")
            .field("image", &self._image.path())
            .finish()
    }
}

impl SnapshotDb {
    /// Open a raw database image.
    pub fn open(image: &[u8]) -> Result<Self> {
        let mut file = NamedTempFile::new()?;
        file.write_all(image)?;
        file.flush()?;

        let conn = Connection::open_with_flags(
            file.path(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        // Fails with "file is not a database" on garbage input.
        let tables: i64 =
            conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| row.get(0))?;
        tracing::debug!("Snapshot opened with {} schema entries", tables);

        Ok(Self {
            conn: Mutex::new(conn),
            _image: file,
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of notes for a character; 0 when the character is unknown.
    pub fn count_notes(&self, character_id: i64) -> Result<i64> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM notes WHERE characterId = ?1",
            params![character_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// All notes of a character, newest first.
    pub fn list_notes(&self, character_id: i64) -> Result<Vec<NoteRecord>> {
        self.list_notes_with_progress(character_id, |_, _| {})
    }

    /// Like [`list_notes`](Self::list_notes), calling `on_row(current, total)`
    /// after each decoded row.
    pub fn list_notes_with_progress(
        &self,
        character_id: i64,
        mut on_row: impl FnMut(usize, usize),
    ) -> Result<Vec<NoteRecord>> {
        let total = self.count_notes(character_id)?.max(0) as usize;
        if total == 0 {
            return Ok(Vec::new());
        }

        let conn = self.conn();
        let mut stmt = conn.prepare(NOTES_BY_CHARACTER)?;
        let columns = NoteColumns::resolve(&stmt)?;

        let mut notes = Vec::with_capacity(total);
        let mut rows = stmt.query(params![character_id])?;
        while let Some(row) = rows.next()? {
            notes.push(columns.decode(row)?);
            on_row(notes.len(), total);
        }

        Ok(notes)
    }

    /// Distinct character IDs in the snapshot, ascending.
    pub fn list_character_ids(&self) -> Result<Vec<i64>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT DISTINCT characterId FROM notes ORDER BY characterId")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }
}

/// Column positions of a note result set, resolved once per statement.
struct NoteColumns {
    character_id: usize,
    note_id: usize,
    created_at: usize,
    metadata: usize,
}

impl NoteColumns {
    fn resolve(stmt: &Statement<'_>) -> Result<Self> {
        Ok(Self {
            character_id: stmt.column_index("characterId")?,
            note_id: stmt.column_index("noteId")?,
            created_at: stmt.column_index("createdAt")?,
            metadata: stmt.column_index("metadata")?,
        })
    }

    fn decode(&self, row: &Row<'_>) -> Result<NoteRecord> {
        let character_id: i64 = row.get(self.character_id)?;
        let note_id: i64 = row.get(self.note_id)?;
        let created_at: String = row.get(self.created_at)?;
        let raw: Option<String> = row.get(self.metadata)?;

        let metadata = parse_metadata(character_id, note_id, raw.as_deref());
        Ok(NoteRecord::new(character_id, note_id, created_at, metadata))
    }
}

/// Parse the metadata column as opaque JSON. Only text that is not JSON at
/// all loses this row's metadata.
fn parse_metadata(character_id: i64, note_id: i64, raw: Option<&str>) -> Option<Value> {
    let raw = raw.filter(|r| !r.is_empty())?;

    match serde_json::from_str(raw) {
        Ok(metadata) => Some(metadata),
        Err(e) => {
            tracing::warn!(
                "Failed to parse metadata of note {}-{}: {}",
                character_id,
                note_id,
                e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_image(rows: &[(i64, i64, &str, Option<&str>)]) -> Vec<u8> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE notes (characterId INTEGER, noteId INTEGER, createdAt TEXT, metadata TEXT)",
        )
        .unwrap();
        for (character_id, note_id, created_at, metadata) in rows {
            conn.execute(
                "INSERT INTO notes VALUES (?1, ?2, ?3, ?4)",
                params![character_id, note_id, created_at, metadata],
            )
            .unwrap();
        }
        drop(conn);
        std::fs::read(&path).unwrap()
    }

    #[test]
    fn test_count_and_list_ordering() {
        let image = build_image(&[
            (1, 1, "2023-01-01T00:00:00Z", Some(r#"{"content":{"title":"old"}}"#)),
            (1, 2, "2023-03-01T00:00:00Z", Some(r#"{"content":{"title":"new"}}"#)),
            (2, 1, "2023-02-01T00:00:00Z", None),
        ]);
        let db = SnapshotDb::open(&image).unwrap();

        assert_eq!(db.count_notes(1).unwrap(), 2);
        assert_eq!(db.count_notes(99).unwrap(), 0);

        let notes = db.list_notes(1).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].note_id, 2);
        assert_eq!(notes[0].content().unwrap().title.as_deref(), Some("new"));
        assert_eq!(notes[1].note_id, 1);

        assert!(db.list_notes(99).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_metadata_does_not_abort_listing() {
        let image = build_image(&[
            (5, 1, "2023-01-01", Some("{not json")),
            (5, 2, "2023-01-02", Some(r#"{"content":{"content":"ok"}}"#)),
            (5, 3, "2023-01-03", Some("")),
        ]);
        let db = SnapshotDb::open(&image).unwrap();

        let notes = db.list_notes(5).unwrap();
        assert_eq!(notes.len(), 3);

        let by_id = |id: i64| notes.iter().find(|n| n.note_id == id).unwrap();
        assert!(by_id(1).metadata().is_none());
        assert!(by_id(3).metadata().is_none());
        assert_eq!(
            by_id(2).content().unwrap().content.as_deref(),
            Some("ok")
        );
    }

    #[test]
    fn test_valid_metadata_with_unexpected_types_is_kept() {
        let first = r#"{"content":{"title":"Kept?","tags":"solo","content":"body"}}"#;
        let second = r#"{"content":{"title":"T2","date_published":1700000000,"summary":null}}"#;
        let image = build_image(&[
            (1, 1, "2023-01-01", Some(first)),
            (1, 2, "2023-01-02", Some(second)),
        ]);
        let db = SnapshotDb::open(&image).unwrap();

        let notes = db.list_notes(1).unwrap();
        let by_id = |id: i64| notes.iter().find(|n| n.note_id == id).unwrap();

        let kept = by_id(1);
        assert_eq!(kept.metadata().unwrap().to_string(), first);
        assert_eq!(kept.content().unwrap().title.as_deref(), Some("Kept?"));
        assert_eq!(kept.content().unwrap().content.as_deref(), Some("body"));
        assert!(kept.content().unwrap().tags.is_none());

        let dated = by_id(2);
        assert_eq!(dated.metadata().unwrap().to_string(), second);
        assert_eq!(dated.content().unwrap().title.as_deref(), Some("T2"));
        assert_eq!(dated.raw_content().unwrap()["date_published"], 1700000000);
    }

    #[test]
    fn test_list_character_ids_distinct_ascending() {
        let image = build_image(&[
            (30, 1, "a", None),
            (10, 1, "a", None),
            (30, 2, "b", None),
            (20, 1, "a", None),
        ]);
        let db = SnapshotDb::open(&image).unwrap();

        assert_eq!(db.list_character_ids().unwrap(), vec![10, 20, 30]);
    }

    #[test]
    fn test_progress_callback() {
        let image = build_image(&[(1, 1, "a", None), (1, 2, "b", None), (1, 3, "c", None)]);
        let db = SnapshotDb::open(&image).unwrap();

        let mut seen = Vec::new();
        db.list_notes_with_progress(1, |current, total| seen.push((current, total)))
            .unwrap();
        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn test_open_rejects_garbage() {
        assert!(SnapshotDb::open(b"this is not a sqlite database at all, not even close").is_err());
    }
}
