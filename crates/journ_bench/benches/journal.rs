//! Journal append/flush throughput benchmarks.
//!
//! Mirrors the shape of a trading-log workload: each record is a timestamp,
//! an id, and a payload, with the caller choosing whether to force the
//! partial block down after every record.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use journ_bench::payload;
use journ_core::{BlockStore, JournalWriter};
use journ_storage::MemoryDevice;
use tempfile::TempDir;

const BLOCK_SIZE: usize = 4096;

fn memory_journal() -> JournalWriter {
    let device = MemoryDevice::with_sector_size(512);
    let store = BlockStore::with_device(Box::new(device), BLOCK_SIZE).unwrap();
    JournalWriter::new(BLOCK_SIZE, store).unwrap()
}

fn file_journal(dir: &TempDir, name: &str) -> JournalWriter {
    let path = dir.path().join(name);
    let sector = journ_storage::sector_size_of(&path).unwrap() as usize;
    // Round the block up to the device's sector size.
    let block = BLOCK_SIZE.max(sector);
    let mut store = BlockStore::create(&path, block).unwrap();
    store.set_size(4096).unwrap();
    JournalWriter::new(block, store).unwrap()
}

fn bench_append_buffered(c: &mut Criterion) {
    let mut group = c.benchmark_group("journal_append_buffered");

    for size in [64, 256, 1024] {
        group.throughput(Throughput::Bytes((size + 12) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut journal = memory_journal();
            let data = payload(size);

            b.iter(|| {
                journal
                    .write_i64(black_box(1_700_000_000), false)
                    .unwrap()
                    .write_i32(black_box(42), false)
                    .unwrap()
                    .write_bytes(black_box(&data), false)
                    .unwrap();
            });
        });
    }

    group.finish();
}

fn bench_append_flush_every_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("journal_append_flush");

    for size in [64, 256, 1024] {
        group.throughput(Throughput::Bytes((size + 12) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut journal = memory_journal();
            let data = payload(size);

            b.iter(|| {
                journal
                    .write_i64(black_box(1_700_000_000), false)
                    .unwrap()
                    .write_i32(black_box(42), false)
                    .unwrap()
                    .write_bytes(black_box(&data), true)
                    .unwrap();
            });
        });
    }

    group.finish();
}

fn bench_file_full_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("journal_file_full_blocks");
    group.sample_size(20);
    group.throughput(Throughput::Bytes(BLOCK_SIZE as u64));

    group.bench_function("whole_block_appends", |b| {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bench.jrn");
        let sector = journ_storage::sector_size_of(&path).unwrap() as usize;
        let block_size = BLOCK_SIZE.max(sector);

        let mut journal = file_journal(&dir, "bench.jrn");
        let block = payload(block_size);

        b.iter(|| {
            journal.write_bytes(black_box(&block), true).unwrap();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_append_buffered,
    bench_append_flush_every_record,
    bench_file_full_blocks
);
criterion_main!(benches);
