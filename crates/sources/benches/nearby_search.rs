//! Benchmarks for the fixture radius scan
//!
//! Run with: cargo bench --package sources

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use place_data::{Candidate, GeoPoint, PlaceIndex};

const CENTER: GeoPoint = GeoPoint { lat: 14.5547, lng: 121.0244 };

const TYPES: &[&str] = &["restaurant", "cafe", "bar", "park", "museum", "night_club"];

/// A deterministic grid of places spread over roughly 20 km
fn synthetic_index(count: usize) -> PlaceIndex {
    let side = (count as f64).sqrt().ceil() as usize;
    let places = (0..count)
        .map(|i| {
            let row = (i / side) as f64;
            let col = (i % side) as f64;
            let loc = GeoPoint::new(CENTER.lat - 0.09 + row * 0.18 / side as f64, CENTER.lng - 0.09 + col * 0.18 / side as f64);
            Candidate::new(format!("place-{}", i), format!("Place {}", i), loc)
                .with_types([TYPES[i % TYPES.len()]])
        })
        .collect();
    PlaceIndex::from_places(places).expect("synthetic places are valid")
}

fn bench_within_radius(c: &mut Criterion) {
    let index = synthetic_index(10_000);

    c.bench_function("within_radius_2km", |b| {
        b.iter(|| {
            let hits = index.within_radius(black_box(CENTER), black_box(2_000.0));
            black_box(hits.len())
        })
    });
}

fn bench_typed_search(c: &mut Criterion) {
    let index = synthetic_index(10_000);
    let types = vec!["cafe".to_string(), "bar".to_string()];

    c.bench_function("search_5km_two_types", |b| {
        b.iter(|| {
            let places = index.search(black_box(CENTER), black_box(5_000.0), black_box(&types));
            black_box(places)
        })
    });
}

criterion_group!(benches, bench_within_radius, bench_typed_search);
criterion_main!(benches);
