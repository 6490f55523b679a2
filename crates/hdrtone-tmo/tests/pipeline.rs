//! End-to-end iCAM06 behaviour.

use hdrtone_core::{Color, Image, Rgba16Image};
use hdrtone_ops::TileExecutor;
use hdrtone_tmo::{ICam06, TmoError};

/// Neutral (roughly D65) XYZ of luminance `y`.
fn grey(y: f64) -> Color {
    Color::xyz(0.9505 * y, y, 1.089 * y)
}

fn scene(width: u32, height: u32) -> Image {
    Image::from_fn(width, height, |x, y| {
        let fx = x as f64 / width as f64;
        let fy = y as f64 / height as f64;
        let lum = 0.5 + 4000.0 * fx * fx * fy;
        Color::xyz(lum * (0.6 + 0.5 * fy), lum, lum * (1.4 - 0.6 * fx))
    })
    .unwrap()
}

fn run(image: &Image, threads: usize, tile_rows: u32) -> Rgba16Image {
    let exec = TileExecutor::with_threads(threads)
        .unwrap()
        .with_tile_rows(tile_rows);
    ICam06::with_defaults(image)
        .with_executor(exec)
        .perform()
        .unwrap()
}

#[test]
fn output_matches_input_bounds() {
    for (w, h) in [(1, 1), (3, 17), (40, 9)] {
        let img = scene(w, h);
        let out = ICam06::with_defaults(&img).perform().unwrap();
        assert_eq!(out.dimensions(), (w, h));
        assert_eq!(out.bounds(), img.bounds());
    }
}

#[test]
fn deterministic_across_runs() {
    let img = scene(48, 32);
    let a = ICam06::with_defaults(&img).perform().unwrap();
    let b = ICam06::with_defaults(&img).perform().unwrap();
    assert_eq!(a, b);
}

#[test]
fn deterministic_across_workers_and_tiles() {
    let img = scene(37, 29);
    let reference = run(&img, 1, 29);
    for (threads, rows) in [(1, 1), (2, 3), (4, 8), (3, 64)] {
        assert_eq!(run(&img, threads, rows), reference, "threads={threads} rows={rows}");
    }
}

#[test]
fn alpha_is_opaque() {
    let img = scene(20, 10);
    let out = ICam06::with_defaults(&img).perform().unwrap();
    assert!(out.data().chunks(4).all(|px| px[3] == u16::MAX));
}

#[test]
fn flat_image_gives_constant_raster() {
    let img = Image::filled(4, 4, grey(120.0)).unwrap();
    let out = ICam06::with_defaults(&img).perform().unwrap();
    let first = out.pixel(0, 0);
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(out.pixel(x, y), first);
        }
    }
    // The brightest channel sits on the white point.
    assert!(first[..3].iter().copied().max().unwrap() >= u16::MAX - 1);
}

#[test]
fn bright_patch_stays_brighter() {
    let img = Image::from_fn(8, 8, |x, y| {
        if (3..5).contains(&x) && (3..5).contains(&y) {
            grey(5000.0)
        } else {
            grey(50.0)
        }
    })
    .unwrap();
    let out = ICam06::with_defaults(&img).perform().unwrap();
    let patch = |x: u32, y: u32| (3..5).contains(&x) && (3..5).contains(&y);
    let background: Vec<_> = (0..8)
        .flat_map(|y| (0..8).map(move |x| (x, y)))
        .filter(|&(x, y)| !patch(x, y))
        .collect();
    assert_eq!(background.len(), 60);
    for (cx, cy) in [(3, 3), (4, 3), (3, 4), (4, 4)] {
        let centre = out.luma(cx, cy);
        for &(x, y) in &background {
            assert!(centre > out.luma(x, y), "({cx}, {cy}) vs ({x}, {y})");
        }
    }
}

#[test]
fn brighter_input_maps_brighter() {
    let img = Image::from_fn(16, 4, |x, _| grey(1.0 + 200.0 * x as f64)).unwrap();
    let out = ICam06::with_defaults(&img).perform().unwrap();
    assert!(out.luma(15, 2) > out.luma(0, 2));
}

#[test]
fn parameters_out_of_range_are_clamped() {
    let img = scene(12, 12);
    let clamped = ICam06::new(&img, 2.0, -1.0, 5.0).perform().unwrap();
    let explicit = ICam06::new(&img, 0.85, 0.0, 1.0).perform().unwrap();
    assert_eq!(clamped, explicit);
}

#[test]
fn contrast_changes_output() {
    let img = scene(24, 16);
    let low = ICam06::new(&img, 0.6, 0.01, 0.99).perform().unwrap();
    let high = ICam06::new(&img, 0.85, 0.01, 0.99).perform().unwrap();
    assert_ne!(low, high);
}

#[test]
fn collapsed_clipping_on_positive_image() {
    // Every sample is positive, so the black point stays at 0 and the
    // white point above it even when both percentiles coincide.
    let img = Image::filled(4, 4, grey(120.0)).unwrap();
    assert!(ICam06::new(&img, 0.75, 0.0, 0.0).perform().is_ok());
    assert!(ICam06::new(&img, 0.75, 0.99, 0.0).perform().is_ok());
}

#[test]
fn degenerate_range_is_an_error() {
    // A pure-Y pixel adapted to a neutral surround keeps a negative red
    // sample. With both percentiles at 0 the white point equals that
    // minimum and the black point cannot sit below it.
    let img = Image::from_fn(12, 12, |x, y| {
        if (x, y) == (6, 6) {
            Color::xyz(0.0, 100.0, 0.0)
        } else {
            grey(100.0)
        }
    })
    .unwrap();
    let err = ICam06::new(&img, 0.75, 0.0, 0.0).perform().unwrap_err();
    match err {
        TmoError::DegenerateRange { min, max } => {
            assert!(min < 0.0, "min={min}");
            assert!(max <= min, "min={min} max={max}");
        }
        other => panic!("expected DegenerateRange, got {other:?}"),
    }
    assert!(ICam06::new(&img, 0.75, 0.01, 0.99).perform().is_ok());
}
