//! Criterion benchmarks for lumptex decode paths
//!
//! Benchmarks the operations every decoded texture goes through:
//! - Patch: validation and column drawing
//! - Transpose: row-major flats into column-major storage
//! - Composite: layering several patches into one texture

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lumptex::composite::{CompositeTextureDefinition, PatchPlacement};
use lumptex::loader::{CompositeLoader, FlatLoader, PatchLoader, TextureLoader};
use lumptex::patch::{draw_patch, validate_patch};
use lumptex::resource::MemoryAccessor;
use lumptex::texture::Texture;
use lumptex::translation::TranslationTable;
use lumptex::transpose::transpose;

// =============================================================================
// Test Data Generators
// =============================================================================

/// Encode a patch where every column holds posts of `run` pixels separated by
/// gaps of the same length.
fn make_patch(width: usize, height: usize, run: usize) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&(width as i16).to_le_bytes());
    data.extend_from_slice(&(height as i16).to_le_bytes());
    data.extend_from_slice(&0i32.to_le_bytes());
    data.resize(8 + 4 * width, 0);

    for x in 0..width {
        let offset = data.len() as i32;
        data[8 + x * 4..12 + x * 4].copy_from_slice(&offset.to_le_bytes());
        let mut top = 0;
        while top + run <= height.min(254) {
            data.push(top as u8);
            data.push(run as u8);
            data.push(0);
            data.extend((0..run).map(|y| ((x + y) % 256) as u8));
            data.push(0);
            top += run * 2;
        }
        data.push(0xFF);
    }
    data
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_patch(c: &mut Criterion) {
    let mut group = c.benchmark_group("patch");

    for size in [64usize, 128, 256] {
        let data = make_patch(size, size.min(254), 8);
        group.throughput(Throughput::Bytes(data.len() as u64));

        group.bench_with_input(BenchmarkId::new("validate", size), &data, |b, data| {
            b.iter(|| validate_patch(black_box(data)))
        });

        let mut texture = Texture::empty();
        texture.init(size as u16, size as u16);
        group.bench_with_input(BenchmarkId::new("draw", size), &data, |b, data| {
            b.iter(|| draw_patch(&mut texture, black_box(data), 0, 0, None))
        });
    }

    let data = make_patch(128, 128, 8);
    let table = TranslationTable::identity().with_range(0..=127, 128);
    let mut texture = Texture::empty();
    texture.init(128, 128);
    group.bench_function("draw_translated_128", |b| {
        b.iter(|| draw_patch(&mut texture, black_box(&data), 0, 0, Some(&table)))
    });

    group.bench_function("draw_clipped_128", |b| {
        b.iter(|| draw_patch(&mut texture, black_box(&data), -40, -40, None))
    });

    group.finish();
}

fn bench_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose");

    for size in [64usize, 256] {
        let source: Vec<u8> = (0..size * size).map(|i| (i % 256) as u8).collect();
        let mut dest = vec![0u8; size * size];
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("square", size), &source, |b, source| {
            b.iter(|| transpose(&mut dest, black_box(source), size, size, None))
        });
    }

    let mut acc = MemoryAccessor::new();
    let flat = acc.insert("FLOOR4_8", vec![7u8; 4096]);
    group.bench_function("flat_loader_64", |b| {
        b.iter(|| FlatLoader::new(&acc, flat).decode())
    });

    group.finish();
}

fn bench_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("composite");

    let mut acc = MemoryAccessor::new();
    let wall = acc.insert("WALL00_1", make_patch(64, 128, 16));
    let trim = acc.insert("SW1S0", make_patch(32, 32, 4));

    let mut definition = CompositeTextureDefinition::new(256, 128);
    for i in 0..4 {
        definition = definition.with_patch(PatchPlacement::new(wall, i * 64, 0));
    }
    definition = definition.with_patch(PatchPlacement::new(trim, 112, 48));

    group.bench_function("five_patches_256x128", |b| {
        b.iter(|| CompositeLoader::new(&acc, black_box(&definition)).decode())
    });

    let single = acc.insert("STEP", make_patch(32, 16, 16));
    group.bench_function("single_patch_loader", |b| {
        b.iter(|| PatchLoader::new(&acc, single).decode())
    });

    group.finish();
}

criterion_group!(benches, bench_patch, bench_transpose, bench_composite);
criterion_main!(benches);
