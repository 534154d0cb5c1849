//! Бенчмарки чтения: индексирование блоков и извлечение окон выборок.

use std::io::Cursor;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};

use sigbin_core::{SignalFile, PREFIX_SIZE, SIGBIN_VERSION};

/// Собирает запись: `n_blocks` блоков по `ns` выборок, `nc` каналов, 250 Гц.
fn build_recording(
    n_blocks: usize,
    nc: usize,
    ns: usize,
) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut raw = Vec::new();

    for block in 0..n_blocks {
        let with_trailer = block == 0;
        let data_size = nc * ns * 4;
        let header_size = if with_trailer {
            PREFIX_SIZE + nc * 8 + 4
        } else {
            PREFIX_SIZE
        };

        raw.extend_from_slice(&SIGBIN_VERSION.to_le_bytes());
        raw.extend_from_slice(&(header_size as i32).to_le_bytes());
        raw.extend_from_slice(&(data_size as i32).to_le_bytes());
        raw.extend_from_slice(&(nc as i32).to_le_bytes());

        if with_trailer {
            for _ in 0..nc {
                raw.extend_from_slice(&1.0f32.to_le_bytes());
            }
            for _ in 0..nc {
                raw.extend_from_slice(&250u32.to_le_bytes());
            }
            raw.extend_from_slice(&0u32.to_le_bytes());
        }

        for _ in 0..nc * ns {
            raw.extend_from_slice(&rng.gen::<f32>().to_le_bytes());
        }
    }

    raw
}

fn bench_index_scan(c: &mut Criterion) {
    // 64 канала × 200 блоков по 1024 выборки ≈ 52 МБ
    let raw = build_recording(200, 64, 1024);
    let mut group = c.benchmark_group("index_scan");

    group.throughput(Throughput::Bytes(raw.len() as u64));
    group.bench_function("open_200_blocks", |b| {
        b.iter_batched(
            || Cursor::new(raw.clone()),
            |cursor| SignalFile::from_reader(cursor).unwrap(),
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

fn bench_window_extraction(c: &mut Criterion) {
    let raw = build_recording(50, 64, 1024);
    let mut file = SignalFile::from_reader(Cursor::new(raw)).unwrap();
    let mut group = c.benchmark_group("window_extraction");

    // Секундное окно посередине записи, через границы блоков
    group.bench_function("one_second_window", |b| {
        b.iter(|| file.read_raw_samples(100.0, 1.0).unwrap())
    });

    group.bench_function("full_recording", |b| {
        b.iter(|| file.read_all_samples().unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_index_scan, bench_window_extraction);
criterion_main!(benches);
