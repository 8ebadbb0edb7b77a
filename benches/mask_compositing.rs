// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, Criterion};
use lasso_patch::domain::editing::{DilationWidth, FeatherRadius};
use lasso_patch::domain::geometry::Point;
use lasso_patch::domain::media::{Mask, RawImage};
use lasso_patch::domain::selection::{LassoPath, Selection};
use lasso_patch::media::composite::{composite_edit, CompositeOptions, ShadowParams};
use lasso_patch::media::mask::{rasterize, MaskOptions};
use std::hint::black_box;

const SIZE: u32 = 1024;

/// Rough circle approximating a freehand lasso stroke.
fn circle_selection(center: f32, radius: f32) -> Selection {
    let points: Vec<Point> = (0..64)
        .map(|i| {
            let angle = (i as f32) * std::f32::consts::TAU / 64.0;
            Point::new(
                center + radius * angle.cos(),
                center + radius * angle.sin(),
            )
        })
        .collect();
    let mut selection = Selection::new();
    selection.push(LassoPath::new(points));
    selection
}

fn solid(rgba: [u8; 4]) -> RawImage {
    let mut bytes = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for _ in 0..SIZE * SIZE {
        bytes.extend_from_slice(&rgba);
    }
    RawImage::from_rgba(SIZE, SIZE, bytes)
}

fn mask_rasterization_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask_rasterization");
    let selection = circle_selection(512.0, 300.0);

    group.bench_function("rasterize_1024_sharp", |b| {
        let options = MaskOptions::default();
        b.iter(|| {
            let _ = black_box(rasterize(&selection, SIZE, SIZE, &options).unwrap());
        });
    });

    group.bench_function("rasterize_1024_feathered", |b| {
        let options = MaskOptions {
            dilation: DilationWidth::new(25.0),
            feather: FeatherRadius::new(16),
            invert: false,
        };
        b.iter(|| {
            let _ = black_box(rasterize(&selection, SIZE, SIZE, &options).unwrap());
        });
    });

    group.finish();
}

fn compositing_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("compositing");
    let original = solid([128, 128, 128, 255]);
    let edited = solid([200, 60, 40, 255]);
    let selection = circle_selection(512.0, 300.0);
    let options = MaskOptions {
        dilation: DilationWidth::new(25.0),
        feather: FeatherRadius::new(8),
        invert: false,
    };
    let mask: Mask = rasterize(&selection, SIZE, SIZE, &options).unwrap();

    group.bench_function("blend_1024", |b| {
        let options = CompositeOptions {
            color_match: false,
            ..CompositeOptions::default()
        };
        b.iter(|| {
            let _ = black_box(composite_edit(&original, &edited, &mask, &options));
        });
    });

    group.bench_function("blend_1024_color_match_shadow", |b| {
        let options = CompositeOptions {
            shadow: Some(ShadowParams::default()),
            ..CompositeOptions::default()
        };
        b.iter(|| {
            let _ = black_box(composite_edit(&original, &edited, &mask, &options));
        });
    });

    group.finish();
}

criterion_group!(benches, mask_rasterization_benchmark, compositing_benchmark);
criterion_main!(benches);
