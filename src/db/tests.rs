use super::*;
use tempfile::tempdir;

fn column_types(db: &Database) -> Vec<(String, String)> {
    let mut stmt = db
        .connection()
        .prepare("PRAGMA table_info(tasting_notes)")
        .unwrap();

    stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(1)?, // name
            row.get::<_, String>(2)?, // type
        ))
    })
    .unwrap()
    .filter_map(|r| r.ok())
    .collect()
}

#[test]
fn in_memory_opens_successfully() {
    let result = Database::in_memory();
    assert!(result.is_ok());
}

#[test]
fn schema_tables_exist() {
    let db = Database::in_memory().unwrap();

    let tables: Vec<String> = db
        .connection()
        .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .filter_map(|r| r.ok())
        .collect();

    assert!(tables.contains(&"tasting_notes".to_string()));
    assert!(tables.contains(&"schema_migrations".to_string()));
}

#[test]
fn schema_indexes_exist() {
    let db = Database::in_memory().unwrap();

    let indexes: Vec<String> = db
        .connection()
        .prepare(
            "SELECT name FROM sqlite_master WHERE type='index' AND name LIKE 'idx_%' ORDER BY name",
        )
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .filter_map(|r| r.ok())
        .collect();

    assert!(indexes.contains(&"idx_tasting_notes_last_modified".to_string()));
    assert!(indexes.contains(&"idx_tasting_notes_is_synced".to_string()));
}

#[test]
fn every_mapped_column_exists() {
    let db = Database::in_memory().unwrap();
    let columns = column_types(&db);

    assert_eq!(columns.len(), NOTE_COLUMNS.len());
    for (live, mapped) in columns.iter().zip(NOTE_COLUMNS) {
        assert_eq!(live.0, *mapped);
    }
}

#[test]
fn timestamps_are_integer_columns() {
    let db = Database::in_memory().unwrap();
    let columns = column_types(&db);

    for name in ["date", "last_modified"] {
        let column = columns
            .iter()
            .find(|(n, _)| n == name)
            .expect("timestamp column should exist");
        assert_eq!(column.1, "INTEGER", "{name} should be epoch millis");
    }
}

#[test]
fn list_columns_default_to_empty_json_arrays() {
    let db = Database::in_memory().unwrap();

    db.connection()
        .execute(
            "INSERT INTO tasting_notes (date, last_modified) VALUES (0, 0)",
            [],
        )
        .unwrap();

    let (aromas, characters): (String, String) = db
        .connection()
        .query_row(
            "SELECT selected_aromas, characters FROM tasting_notes",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();

    assert_eq!(aromas, "[]");
    assert_eq!(characters, "[]");
}

#[test]
fn migrations_are_recorded() {
    let db = Database::in_memory().unwrap();

    let version = current_version(db.connection()).unwrap();
    assert_eq!(version, MIGRATIONS.last().unwrap().version);

    let count: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count as usize, MIGRATIONS.len());
}

#[test]
fn open_creates_database_file() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db");

    let result = Database::open(&db_path);
    assert!(result.is_ok());
    assert!(db_path.exists());
}

#[test]
fn reopen_is_idempotent() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db");

    // Open and close first time
    {
        let db = Database::open(&db_path).unwrap();
        db.connection()
            .execute(
                "INSERT INTO tasting_notes (name, date, last_modified) VALUES ('test', 0, 0)",
                [],
            )
            .unwrap();
    }

    // Reopen - migrations must not run twice
    let db2 = Database::open(&db_path);
    assert!(db2.is_ok());
    let db2 = db2.unwrap();

    let count: i32 = db2
        .connection()
        .query_row("SELECT COUNT(*) FROM tasting_notes", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);

    let migrations: i64 = db2
        .connection()
        .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
        .unwrap();
    assert_eq!(migrations as usize, MIGRATIONS.len());
}

#[test]
fn open_rejects_table_with_unmapped_column() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("drifted.db");

    {
        let db = Database::open(&db_path).unwrap();
        db.connection()
            .execute("ALTER TABLE tasting_notes ADD COLUMN rogue TEXT", [])
            .unwrap();
    }

    let err = Database::open(&db_path).err().expect("open should fail");
    assert!(format!("{err:#}").contains("rogue"));
}
