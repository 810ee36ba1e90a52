use student_roster::{
    Config, RecordStore, RosterError, SessionController, StudentDraft, StudentInput,
};
use tempfile::tempdir;

fn draft(name: &str, attendance: i64) -> StudentDraft {
    StudentDraft {
        name: name.to_string(),
        address: "Incheon".to_string(),
        phone: "032-555-0100".to_string(),
        attendance,
        homework_score: 77,
    }
}

#[test]
fn open_creates_missing_data_directory() {
    let dir = tempdir().expect("tempdir should be created");
    let config = Config::with_data_dir(dir.path().join("nested").join("roster"));

    let store = RecordStore::open(&config.db_path).expect("store should open");
    assert!(config.db_path.exists());
    store.close().expect("store should close");
}

#[test]
fn rows_survive_close_and_reopen() {
    let dir = tempdir().expect("tempdir should be created");
    let db_path = dir.path().join("students.db");

    let store = RecordStore::open(&db_path).expect("store should open");
    let id = store.create(&draft("Kim", 180)).expect("insert should work");
    store.close().expect("store should close");

    let store = RecordStore::open(&db_path).expect("store should reopen");
    store.init_schema().expect("schema init should be idempotent");
    let students = store.list_all().expect("list should work");
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].id, id);
    let kim = &students[0];
    assert_eq!(kim.name, "Kim");
    assert_eq!(kim.address, "Incheon");
    assert_eq!(kim.phone, "032-555-0100");
    assert_eq!(kim.attendance, 180);
    assert_eq!(kim.homework_score, 77);
    store.close().expect("store should close");
}

#[test]
fn reads_files_written_with_null_optional_columns() {
    let dir = tempdir().expect("tempdir should be created");
    let db_path = dir.path().join("students.db");
    {
        let conn = rusqlite::Connection::open(&db_path).expect("raw open");
        conn.execute_batch(
            "CREATE TABLE students (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                address TEXT,
                phone TEXT,
                attendance INTEGER DEFAULT 0,
                homework_score INTEGER DEFAULT 0
            );
            INSERT INTO students (name, address, phone, attendance, homework_score)
            VALUES ('Old', NULL, NULL, NULL, NULL);
            INSERT INTO students (name) VALUES ('Defaults');",
        )
        .expect("seed legacy rows");
    }

    let store = RecordStore::open(&db_path).expect("store should open");
    let students = store.list_all().expect("list should work");
    assert_eq!(students.len(), 2);
    assert!(students
        .iter()
        .all(|s| s.address.is_empty() && s.attendance == 0 && s.homework_score == 0));

    let stats = store.aggregate_statistics().expect("stats should work");
    assert_eq!(stats.count, 2);
    assert_eq!(stats.avg_attendance, 0.0);
}

#[test]
fn reads_files_with_real_valued_counters() {
    let dir = tempdir().expect("tempdir should be created");
    let db_path = dir.path().join("students.db");
    {
        let store = RecordStore::open(&db_path).expect("store should open");
        store.close().expect("store should close");
        let conn = rusqlite::Connection::open(&db_path).expect("raw open");
        conn.execute(
            "INSERT INTO students (name, attendance, homework_score) VALUES ('Legacy', 10.5, 99.9)",
            [],
        )
        .expect("seed legacy row");
    }

    let mut controller =
        SessionController::new(RecordStore::open(&db_path).expect("store should reopen"));
    let view = controller.refresh().expect("refresh should read the legacy row");
    assert_eq!(view.students.len(), 1);
    assert_eq!(view.students[0].attendance, 10);
    assert_eq!(view.students[0].homework_score, 99);

    let view = controller
        .submit_create(&StudentInput {
            name: "Kim".to_string(),
            attendance: "20".to_string(),
            ..StudentInput::default()
        })
        .expect("create should succeed next to the legacy row");
    assert_eq!(view.statistics.count, 2);
    assert_eq!(view.statistics.avg_attendance, 15.0);
    assert_eq!(controller.refresh().expect("refresh").students.len(), 2);
    controller.shutdown().expect("shutdown should close the store");
}

#[test]
fn controller_session_against_a_file() {
    let dir = tempdir().expect("tempdir should be created");
    let db_path = dir.path().join("students.db");
    let mut controller =
        SessionController::new(RecordStore::open(&db_path).expect("store should open"));

    for (name, attendance) in [("Kim", "10"), ("Lee", "20"), ("Park", "30")] {
        controller
            .submit_create(&StudentInput {
                name: name.to_string(),
                attendance: attendance.to_string(),
                ..StudentInput::default()
            })
            .expect("create should work");
    }

    let view = controller.refresh().expect("refresh should work");
    assert_eq!(view.statistics.count, 3);
    assert_eq!(view.statistics.avg_attendance, 20.0);

    let park = view.students[2].id;
    controller.select(park).expect("select should work");
    controller.submit_delete().expect("delete should work");
    controller.shutdown().expect("shutdown should close the store");

    let mut controller =
        SessionController::new(RecordStore::open(&db_path).expect("store should reopen"));
    let view = controller.refresh().expect("refresh should work");
    assert_eq!(view.students.len(), 2);
    assert!(matches!(
        controller.select(park),
        Err(RosterError::NotFound { .. })
    ));
    controller.shutdown().expect("shutdown should close the store");
}
