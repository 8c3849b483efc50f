use apinotes_core::diagnostics::CollectingDiagnosticHandler;
use apinotes_core::fs::MockFileSystem;
use apinotes_core::{ApiNotesManager, ApiNotesOptions, SourceManager};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

/// A chain of `depth` nested directories with notes at the top and a header
/// at every level
fn tree(depth: usize) -> (MockFileSystem, Vec<String>) {
    let mut fs = MockFileSystem::new();
    fs.add_file("/root/APINotes.apinotes", "Name: Root\n");
    let mut headers = Vec::with_capacity(depth);
    let mut dir = String::from("/root");
    for i in 0..depth {
        dir.push_str(&format!("/level{}", i));
        let header = format!("{}/h{}.h", dir, i);
        fs.add_file(&header, "");
        headers.push(header);
    }
    (fs, headers)
}

fn manager(fs: &MockFileSystem) -> ApiNotesManager {
    ApiNotesManager::new(
        SourceManager::new(Arc::new(fs.clone())),
        ApiNotesOptions::default(),
        Arc::new(CollectingDiagnosticHandler::new()),
    )
    .unwrap()
}

fn bench_cold_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("cold_resolution");

    for depth in [4, 16, 64].iter() {
        let (fs, headers) = tree(*depth);
        let deepest = headers.last().unwrap().clone();

        group.bench_with_input(BenchmarkId::from_parameter(depth), &deepest, |b, header| {
            b.iter(|| {
                let mut manager = manager(&fs);
                manager.find_api_notes_for_file(black_box(header)).len()
            })
        });
    }

    group.finish();
}

fn bench_cached_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_resolution");

    for depth in [4, 16, 64].iter() {
        let (fs, headers) = tree(*depth);
        let mut manager = manager(&fs);
        manager.find_api_notes_for_file(headers.last().unwrap());

        group.bench_with_input(BenchmarkId::from_parameter(depth), &headers, |b, headers| {
            b.iter(|| {
                headers
                    .iter()
                    .map(|h| manager.find_api_notes_for_file(black_box(h)).len())
                    .sum::<usize>()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cold_resolution, bench_cached_resolution);
criterion_main!(benches);
