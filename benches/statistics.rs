use std::fmt::Write as _;
use std::fs;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use data_summary::dataset::DataSet;
use tempfile::TempDir;

const REGIONS: [&str; 5] = ["Western Europe", "Latin America", "Eastern Asia", "Sub-Saharan Africa", "Oceania"];

fn write_fixture(dir: &TempDir, rows: usize) -> DataSet {
    let mut json = String::from("{\"data\": [");
    for i in 0..rows {
        if i > 0 {
            json.push(',');
        }
        // Every seventh record omits its score so normalization has work to do.
        let score = if i % 7 == 0 {
            String::new()
        } else {
            format!(", \"Score\": {}", (i % 1000) as f64 / 100.0)
        };
        let _ = write!(
            json,
            "{{\"Country\": \"c{i}\", \"Region\": \"{}\"{score}}}",
            REGIONS[i % REGIONS.len()]
        );
    }
    json.push_str("]}");

    let data = dir.path().join(format!("data_{rows}.json"));
    let meta = dir.path().join("meta.csv");
    fs::write(&data, json).unwrap();
    fs::write(&meta, "Country,Region,Score\nCategorical,Categorical,Quantitative\n").unwrap();
    DataSet::open(&data, &meta).unwrap()
}

fn bench_statistics(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let mut group = c.benchmark_group("statistics");

    for rows in [1_000usize, 10_000] {
        let ds = write_fixture(&dir, rows);
        group.bench_with_input(BenchmarkId::new("mean", rows), &ds, |b, ds| {
            b.iter(|| ds.mean("Score").unwrap())
        });
        group.bench_with_input(BenchmarkId::new("max", rows), &ds, |b, ds| {
            b.iter(|| ds.max("Score").unwrap())
        });
        group.bench_with_input(BenchmarkId::new("mode_region", rows), &ds, |b, ds| {
            b.iter(|| ds.mode("Region").unwrap())
        });
        group.bench_with_input(BenchmarkId::new("unique_region", rows), &ds, |b, ds| {
            b.iter(|| ds.unique("Region").unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_statistics);
criterion_main!(benches);
