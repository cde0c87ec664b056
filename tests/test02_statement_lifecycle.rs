use std::sync::{Arc, Mutex};

use sql_typed_core::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Default)]
struct Recorded {
    usage: Vec<String>,
    engine: Vec<(i32, String)>,
}

fn recording_hooks() -> (FailureHooks, Arc<Mutex<Recorded>>) {
    let log = Arc::new(Mutex::new(Recorded::default()));
    let (usage_log, engine_log) = (Arc::clone(&log), Arc::clone(&log));
    let hooks = FailureHooks::new()
        .with_usage(move |msg| usage_log.lock().unwrap().usage.push(msg.to_owned()))
        .with_engine(move |code, msg| {
            engine_log
                .lock()
                .unwrap()
                .engine
                .push((code, msg.to_owned()));
        });
    (hooks, log)
}

fn seeded() -> Result<Connection, SqlTypedError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(
        "CREATE TABLE test (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
         INSERT INTO test VALUES (1, 'Hello World'), (2, 'Hello Two'), (3, 'Tree Hello');",
    )?;
    Ok(conn)
}

#[test]
fn step_after_terminal_state_is_refused_without_engine_call() -> TestResult {
    let conn = seeded()?;
    let (hooks, log) = recording_hooks();

    let mut finished = conn.prepare::<(i64,)>("SELECT id FROM test WHERE id = 1").with_hooks(hooks.clone());
    assert_eq!(finished.step()?, StepOutcome::Row);
    assert_eq!(finished.step()?, StepOutcome::Done);
    let steps = finished.engine_steps();
    assert!(finished.step().unwrap_err().is_usage());
    assert_eq!(finished.engine_steps(), steps);
    assert_eq!(finished.status(), StatementStatus::Finished);

    let mut failed = conn.prepare::<(i64,)>("SELECT nope FROM test").with_hooks(hooks);
    assert_eq!(failed.status(), StatementStatus::Failed);
    assert!(failed.step().unwrap_err().is_usage());
    assert_eq!(failed.engine_steps(), 0);

    let log = log.lock().unwrap();
    assert_eq!(log.usage.len(), 2);
    assert!(log.engine.is_empty());
    Ok(())
}

#[test]
fn bind_is_only_legal_before_the_first_step() -> TestResult {
    let conn = seeded()?;
    let (hooks, log) = recording_hooks();
    let mut stmt = conn
        .prepare::<(String,)>("SELECT name FROM test WHERE id >= ? ORDER BY id")
        .with_hooks(hooks);

    stmt.bind(&(1,))?;
    stmt.bind(&(2,))?;
    assert_eq!(stmt.step()?, StepOutcome::Row);
    assert_eq!(stmt.row().map(|r| r.0.as_str()), Some("Hello Two"));

    let err = stmt.bind(&(1,)).unwrap_err();
    assert!(matches!(err, SqlTypedError::Usage(_)));
    assert_eq!(stmt.status(), StatementStatus::Running);
    assert_eq!(stmt.row().map(|r| r.0.as_str()), Some("Hello Two"));
    assert_eq!(log.lock().unwrap().usage.len(), 1);
    Ok(())
}

#[test]
fn execute_on_row_query_is_usage_error_and_keeps_row() -> TestResult {
    let conn = seeded()?;
    let (hooks, log) = recording_hooks();
    let mut stmt = conn
        .prepare::<(i64, String)>("SELECT id, name FROM test ORDER BY id")
        .with_hooks(hooks);

    assert!(stmt.execute().unwrap_err().is_usage());
    assert_eq!(stmt.status(), StatementStatus::Running);
    assert_eq!(stmt.row(), Some(&(1, "Hello World".to_owned())));
    assert_eq!(log.lock().unwrap().usage, ["got row in statement execute"]);

    let rest: Vec<(i64, String)> = stmt.rows().cloned().collect();
    assert_eq!(rest.len(), 3);
    Ok(())
}

#[test]
fn invalid_sql_fails_once() -> TestResult {
    let conn = seeded()?;
    let (hooks, log) = recording_hooks();
    let mut conn = conn;
    conn.set_hooks(hooks);

    let stmt = conn.prepare::<(i64,)>("SELEKT id FRM test");
    assert!(!stmt.is_ok());
    assert_eq!(stmt.status(), StatementStatus::Failed);
    assert!(!stmt.can_step());
    assert!(stmt.row().is_none());
    let code = stmt.last_error().map(|e| e.code).ok_or("missing error")?;
    assert_eq!(code & 0xff, 1);

    let log = log.lock().unwrap();
    assert_eq!(log.engine.len(), 1);
    assert_ne!(log.engine[0].0, 0);
    drop(stmt);
    assert_eq!(conn.last_error_code(), code);
    Ok(())
}

#[test]
fn out_of_range_bind_fails_the_statement() -> TestResult {
    let conn = seeded()?;
    let (hooks, log) = recording_hooks();
    let mut stmt = conn.prepare::<(i64,)>("SELECT ?").with_hooks(hooks);

    let err = stmt.bind(&(1, 2)).unwrap_err();
    assert_eq!(err.engine_code(), Some(25));
    assert_eq!(stmt.status(), StatementStatus::Failed);
    assert!(stmt.step().unwrap_err().is_usage());

    let log = log.lock().unwrap();
    assert_eq!(log.engine.len(), 1);
    assert_eq!(log.engine[0].0, 25);
    Ok(())
}

#[test]
fn later_bind_failure_releases_the_statement_once() -> TestResult {
    let conn = seeded()?;
    let (hooks, log) = recording_hooks();
    let mut stmt = conn
        .prepare::<(String,)>("SELECT name FROM test WHERE id = ?")
        .with_hooks(hooks);

    stmt.bind_index(0, &2)?;
    let err = stmt.bind_index(1, "extra").unwrap_err();
    assert_eq!(err.engine_code(), Some(25));
    assert_eq!(stmt.status(), StatementStatus::Failed);
    assert_eq!(stmt.last_error().map(|e| e.code), Some(25));

    assert!(stmt.bind_index(0, &1).unwrap_err().is_usage());
    assert!(stmt.bind(&(1,)).unwrap_err().is_usage());
    assert!(stmt.step().unwrap_err().is_usage());
    assert_eq!(stmt.engine_steps(), 0);
    assert_eq!(stmt.status(), StatementStatus::Failed);

    let log = log.lock().unwrap();
    assert_eq!(log.engine.len(), 1);
    assert_eq!(log.engine[0].0, 25);
    assert_eq!(log.usage.len(), 3);
    Ok(())
}

#[test]
fn with_params_failure_is_reported_through_status() -> TestResult {
    let conn = seeded()?;
    let stmt = conn.prepare_with::<(i64,), _>("SELECT ?", &(1, 2, 3));
    assert!(!stmt.is_ok());
    assert_eq!(stmt.parameter_count(), 1);
    Ok(())
}

#[test]
fn engine_error_mid_iteration_ends_rows_and_fails() -> TestResult {
    let conn = seeded()?;
    let (hooks, log) = recording_hooks();
    let mut stmt = conn
        .prepare::<(i64,)>(
            "SELECT CASE WHEN id < 3 THEN id ELSE abs(id - 3 - 9223372036854775807 - 1) END FROM test ORDER BY id",
        )
        .with_hooks(hooks);

    let mut seen = Vec::new();
    let mut rows = stmt.rows();
    while let Some((id,)) = rows.next() {
        seen.push(*id);
    }
    assert_eq!(seen, [1, 2]);
    assert!(!stmt.is_ok());
    assert_eq!(stmt.status(), StatementStatus::Failed);
    assert!(stmt.last_error().is_some());
    assert!(!log.lock().unwrap().engine.is_empty());
    Ok(())
}

#[test]
fn constraint_violation_fails_execute() -> TestResult {
    let conn = seeded()?;
    let mut stmt = conn.prepare_with::<(), _>(
        "INSERT INTO test (id, name) VALUES (?, ?)",
        &(1, "duplicate"),
    );
    let err = stmt.execute().unwrap_err();
    assert_eq!(err.engine_code().map(|c| c & 0xff), Some(19));
    assert_eq!(stmt.status(), StatementStatus::Failed);
    drop(stmt);
    assert_eq!(conn.last_error_code() & 0xff, 19);
    Ok(())
}

#[test]
fn bind_index_sets_single_parameters() -> TestResult {
    let conn = seeded()?;
    let mut stmt = conn.prepare::<(String,)>("SELECT name FROM test WHERE id = ?1 OR id = ?2 ORDER BY id DESC");
    stmt.bind_index(0, &1)?;
    stmt.bind_index(1, "3")?;
    let names: Vec<String> = stmt.rows().cloned().map(|(n,)| n).collect();
    assert_eq!(names, ["Tree Hello", "Hello World"]);
    assert_eq!(stmt.parameter_count(), 2);
    assert_eq!(stmt.column_names(), ["name"]);
    Ok(())
}
