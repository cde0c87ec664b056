//! Criterion comparison of full-table iteration through raw `rusqlite` and through a typed
//! `Statement`. Both variants read the same seeded in-memory table so the difference is the
//! per-row overhead of extraction and the state machine.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sql_typed_core::prelude::*;

/// Resolve how many rows to seed.
fn row_count() -> usize {
    std::env::var("BENCH_ROWS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(10_000)
}

const SEED_SQL: &str = "
    CREATE TABLE test (
        id      INTEGER PRIMARY KEY,
        name    TEXT NOT NULL,
        score   REAL NOT NULL,
        payload BLOB
    );";

fn seed_typed(conn: &Connection, rows: usize) -> Result<(), SqlTypedError> {
    conn.execute_batch(SEED_SQL)?;
    conn.execute_batch("BEGIN")?;
    for id in 0..rows {
        let mut insert = conn.prepare_with::<(), _>(
            "INSERT INTO test (id, name, score, payload) VALUES (?, ?, ?, ?)",
            &(id, format!("name-{id}"), id as f64 * 0.5, vec![0_u8; 16]),
        );
        insert.execute()?;
    }
    conn.execute_batch("COMMIT")
}

fn seed_raw(conn: &rusqlite::Connection, rows: usize) -> rusqlite::Result<()> {
    conn.execute_batch(SEED_SQL)?;
    let tx = conn.unchecked_transaction()?;
    {
        let mut insert =
            tx.prepare("INSERT INTO test (id, name, score, payload) VALUES (?1, ?2, ?3, ?4)")?;
        for id in 0..rows {
            insert.execute(rusqlite::params![
                id as i64,
                format!("name-{id}"),
                id as f64 * 0.5,
                vec![0_u8; 16]
            ])?;
        }
    }
    tx.commit()
}

fn bench_row_iteration(c: &mut Criterion) {
    let rows = row_count();
    let typed = Connection::open_in_memory().expect("open typed connection");
    seed_typed(&typed, rows).expect("seed typed connection");
    let raw = rusqlite::Connection::open_in_memory().expect("open raw connection");
    seed_raw(&raw, rows).expect("seed raw connection");

    let mut group = c.benchmark_group("row_iteration");
    group.throughput(Throughput::Elements(rows as u64));

    group.bench_with_input(BenchmarkId::new("rusqlite", rows), &rows, |b, _| {
        b.iter(|| {
            let mut stmt = raw
                .prepare_cached("SELECT id, name, score, payload FROM test")
                .expect("prepare");
            let mut total = 0_i64;
            let mut rows = stmt.query([]).expect("query");
            while let Some(row) = rows.next().expect("step") {
                let id: i64 = row.get(0).expect("id");
                let name: String = row.get(1).expect("name");
                let _score: f64 = row.get(2).expect("score");
                let payload: Vec<u8> = row.get(3).expect("payload");
                total += id + name.len() as i64 + payload.len() as i64;
            }
            black_box(total)
        });
    });

    group.bench_with_input(BenchmarkId::new("typed_rows", rows), &rows, |b, _| {
        b.iter(|| {
            let mut stmt = typed
                .prepare::<(i64, String, f64, Vec<u8>)>("SELECT id, name, score, payload FROM test");
            let mut total = 0_i64;
            let mut rows = stmt.rows();
            while let Some((id, name, _score, payload)) = rows.next() {
                total += id + name.len() as i64 + payload.len() as i64;
            }
            black_box(total)
        });
    });

    group.bench_with_input(BenchmarkId::new("typed_cloned", rows), &rows, |b, _| {
        b.iter(|| {
            let mut stmt = typed
                .prepare::<(i64, String, f64, Vec<u8>)>("SELECT id, name, score, payload FROM test");
            let collected: Vec<_> = stmt.rows().cloned().collect();
            black_box(collected.len())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_row_iteration);
criterion_main!(benches);
