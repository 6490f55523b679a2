//! Benchmarks for hdrtone operations.
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use hdrtone_color::{TripletConvert, srgb};
use hdrtone_core::{Color, Image};
use hdrtone_ops::TileExecutor;
use hdrtone_ops::bilateral::bilateral_y;
use hdrtone_ops::blur::gaussian_blur;
use hdrtone_tmo::ICam06;

/// Synthetic HDR scene: a smooth gradient with a bright window.
fn scene(width: u32, height: u32) -> Image {
    Image::from_fn(width, height, |x, y| {
        let fx = x as f64 / width as f64;
        let fy = y as f64 / height as f64;
        let window = (0.6..0.8).contains(&fx) && (0.2..0.4).contains(&fy);
        let lum = if window { 8000.0 } else { 2.0 + 300.0 * fx * fy };
        Color::xyz(0.95 * lum, lum, (1.2 - 0.3 * fy) * lum)
    })
    .unwrap()
}

/// Benchmark per-pixel color conversions.
fn bench_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("color");
    let values: Vec<[f64; 3]> = (0..10000)
        .map(|i| {
            let v = 1.0 + i as f64 * 0.01;
            [0.95 * v, v, 1.08 * v]
        })
        .collect();
    group.throughput(Throughput::Elements(values.len() as u64));

    group.bench_function("xyz_to_ipt", |b| {
        b.iter(|| values.iter().map(|v| black_box(*v).xyz_to_ipt()).collect::<Vec<_>>())
    });

    group.bench_function("srgb_oetf", |b| {
        b.iter(|| {
            values
                .iter()
                .map(|v| srgb::oetf(black_box(v[1] / 100.0)))
                .collect::<Vec<_>>()
        })
    });

    group.finish();
}

/// Benchmark the blur operators behind the layer decomposition.
fn bench_blur(c: &mut Criterion) {
    let mut group = c.benchmark_group("blur");
    group.sample_size(20);

    for size in [128u32, 512].iter() {
        let img = scene(*size, *size);
        group.throughput(Throughput::Elements((*size as u64).pow(2)));

        group.bench_with_input(BenchmarkId::new("gaussian_half_dim", size), &img, |b, img| {
            b.iter(|| gaussian_blur(black_box(img), (*size / 2) as f64).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("bilateral_y", size), &img, |b, img| {
            b.iter(|| bilateral_y(black_box(img), 0.02 * *size as f64).unwrap())
        });
    }

    group.finish();
}

/// Benchmark the full iCAM06 pipeline.
fn bench_icam06(c: &mut Criterion) {
    let mut group = c.benchmark_group("icam06");
    group.sample_size(10);

    let img = scene(512, 384);
    group.throughput(Throughput::Elements(img.size() as u64));

    group.bench_function("perform_512x384", |b| {
        b.iter(|| ICam06::with_defaults(black_box(&img)).perform().unwrap())
    });

    for threads in [1usize, 4] {
        group.bench_with_input(BenchmarkId::new("threads", threads), &threads, |b, &t| {
            let exec = TileExecutor::with_threads(t).unwrap();
            b.iter(|| exec.install(|| ICam06::with_defaults(black_box(&img)).perform().unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_color, bench_blur, bench_icam06);
criterion_main!(benches);
