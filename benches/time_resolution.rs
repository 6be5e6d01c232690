// benches/time_resolution.rs
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use meshfamily_rs::decoder::memory::{MemoryDecoderFactory, MemoryFile};
use meshfamily_rs::reader::resolve_time;
use meshfamily_rs::*;
use std::path::PathBuf;
use std::sync::Arc;

fn axis(size: usize, files: usize) -> Vec<GlobalStep> {
    let per_file = size / files;
    (0..size)
        .map(|i| GlobalStep {
            step: i,
            time: Some(i as f64 * 0.1),
            path: PathBuf::from(format!("run.e-s{:03}", i / per_file)),
            file: i / per_file,
            local: i % per_file,
        })
        .collect()
}

fn benchmark_resolve_time(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_time");

    for size in [100, 10000, 1000000].iter() {
        let steps = axis(*size, 10);
        let index = TimeIndex::new(&steps);
        let target = *size as f64 * 0.1 * 0.637;
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size), &steps, |b, steps| {
            b.iter(|| resolve_time(TimeRequest::Time(target), true, steps, &index).unwrap());
        });
    }

    group.finish();
}

fn benchmark_update_cycle(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("run.e");
    std::fs::write(&base, b"").unwrap();

    let times: Vec<f64> = (0..100).map(|i| i as f64).collect();
    let points: Vec<[f64; 3]> = (0..10000).map(|i| [i as f64, 0.0, 0.0]).collect();
    let u: Vec<Vec<f64>> = times.iter().map(|t| vec![*t; points.len()]).collect();

    let factory = Arc::new(MemoryDecoderFactory::new());
    factory.insert(
        &base,
        MemoryFile::new(&times)
            .with_partition(PartitionEntry::new(PartitionKind::ElementBlock, "solid", 1), points)
            .with_field(1, "u", Association::Nodal, 1, u),
    );

    let mut reader = FamilyReader::new(&base, factory);
    reader.update_information().unwrap();

    let mut group = c.benchmark_group("update_cycle");
    group.bench_function("interpolated_10k_points", |b| {
        b.iter(|| {
            reader.set_options(ReaderOptions::default().with_time(42.5));
            reader.update_information().unwrap();
            reader.update_data().unwrap();
        });
    });
    group.finish();
}

criterion_group!(benches, benchmark_resolve_time, benchmark_update_cycle);
criterion_main!(benches);
