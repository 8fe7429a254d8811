//! Benchmarks for segment filtering and path operations.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mirror_tree::{FolderPath, SegmentFilter};

fn bench_segment_filter(c: &mut Criterion) {
    let filter = SegmentFilter::new();
    let multibyte = SegmentFilter::multibyte();

    c.bench_function("filter_short_title", |b| {
        b.iter(|| filter.filter(black_box("Create Page Test")))
    });

    c.bench_function("filter_messy_title", |b| {
        b.iter(|| filter.filter(black_box("  News & Events: Q1/Q2 -- 100% Coverage!!  ")))
    });

    let long_title = "Annual Report & Financial Statements ".repeat(50);
    c.bench_function("filter_long_title", |b| {
        b.iter(|| filter.filter(black_box(&long_title)))
    });

    c.bench_function("filter_multibyte_title", |b| {
        b.iter(|| multibyte.filter(black_box("Büro Köln: Übersicht der Abteilungen")))
    });
}

fn bench_folder_path(c: &mut Criterion) {
    c.bench_function("path_new_deep", |b| {
        b.iter(|| FolderPath::new(black_box("Articles/2024/q1/news/local/updates")))
    });

    let base = FolderPath::new("Articles/2024/q1");
    c.bench_function("path_join", |b| {
        b.iter(|| base.join(black_box("news")))
    });

    let deep = FolderPath::new("a/b/c/d/e/f/g/h");
    c.bench_function("path_parent_chain", |b| {
        b.iter(|| {
            let mut current = Some(deep.clone());
            while let Some(path) = current {
                current = path.parent();
            }
        })
    });
}

criterion_group!(benches, bench_segment_filter, bench_folder_path);
criterion_main!(benches);
