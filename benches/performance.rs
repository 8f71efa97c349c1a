use budget_cycle::{
    ledger::{Archive, LedgerState},
    storage::{codec, FileStore, MemoryStore, StorageKeys},
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;
use tempfile::tempdir;

fn build_sample_ledger(days: usize, entries_per_day: usize) -> (LedgerState, Archive) {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let logged_at = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
    let mut state = LedgerState::new(start);
    let mut archive = Archive::new();

    for day in 0..=days {
        state.set_budget(Decimal::new(50_000, 2)).unwrap();
        for idx in 0..entries_per_day {
            let amount = Decimal::new(100 + (idx % 900) as i64, 2);
            let at = logged_at + Duration::days(day as i64) + Duration::minutes(idx as i64);
            state.add_expense("Snacks", amount, at).unwrap();
        }
        if day < days {
            state.finalize(&mut archive).unwrap();
        }
    }
    (state, archive)
}

fn bench_totals(c: &mut Criterion) {
    let (state, _) = build_sample_ledger(0, black_box(10_000));

    c.bench_function("cycle_totals_10k", |b| {
        b.iter(|| black_box(state.compute_totals()))
    });

    c.bench_function("budget_usage_10k", |b| b.iter(|| black_box(state.usage())));
}

fn bench_persistence(c: &mut Criterion) {
    let (state, archive) = build_sample_ledger(black_box(365), 20);
    let keys = StorageKeys::default();

    c.bench_function("persist_year_memory", |b| {
        let mut store = MemoryStore::new();
        b.iter(|| codec::persist(&mut store, &keys, &state, &archive).expect("persist"))
    });

    let dir = tempdir().expect("tempdir");
    let mut store = FileStore::new(dir.path().join("data")).expect("file store");

    c.bench_function("persist_year_files", |b| {
        b.iter(|| codec::persist(&mut store, &keys, &state, &archive).expect("persist"))
    });

    codec::persist(&mut store, &keys, &state, &archive).expect("seed");
    let today = state.cycle_date();

    c.bench_function("restore_year_files", |b| {
        b.iter(|| {
            let loaded = codec::restore(&store, &keys, today).expect("restore");
            black_box(loaded);
        })
    });
}

criterion_group!(benches, bench_totals, bench_persistence);
criterion_main!(benches);
