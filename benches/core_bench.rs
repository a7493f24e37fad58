use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use event_planner_map::app::{EventCatalog, FilterCategory, GeometryStore, ShapeKind, VisibilityFilters};
use event_planner_map::core::{geometry, metrics};
use event_planner_map::map::{DrawKind, LayerSpec, LayerStyle};
use event_planner_map::{Event, HeadlessMap, MapSurface, Point};
use glam::DVec2;
use std::hint::black_box;

fn build_polyline(vertex_count: usize) -> String {
    let positions: Vec<DVec2> = (0..vertex_count)
        .map(|i| {
            let t = i as f64 * 0.0001;
            DVec2::new(2.35 + t, 48.85 + (t * 40.0).sin() * 0.001)
        })
        .collect();
    geometry::line_geojson(&positions)
}

fn bench_zone_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("zone_metrics");

    for &vertex_count in &[16usize, 1_024usize] {
        let text = build_polyline(vertex_count);
        group.bench_with_input(
            BenchmarkId::new("length_and_quantity", vertex_count),
            &text,
            |b, text| {
                b.iter(|| {
                    let length = metrics::length(black_box(text));
                    black_box(metrics::quantity(length, Some(2.5)))
                })
            },
        );
    }

    group.finish();
}

fn build_catalog(
    point_count: usize,
    map: &mut HeadlessMap,
) -> (EventCatalog, GeometryStore) {
    let event = Event::new("Bench", None, None);
    let mut catalog = EventCatalog::for_event(event.clone());
    let mut store = GeometryStore::new();

    for index in 0..point_count {
        let position = DVec2::new(index as f64 * 0.0001, 0.0);
        let point = Point::new(event.id, position, index % 10 == 0, index as u32);
        let layer = map.add_layer(LayerSpec {
            kind: DrawKind::Marker,
            geojson: geometry::point_geojson(position),
            style: LayerStyle::new("#3388ff", 2.0),
        });
        store.bind(map, point.id, ShapeKind::Point, layer);
        catalog.upsert_point(point);
    }

    (catalog, store)
}

fn bench_visibility_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("visibility_toggle");

    for &point_count in &[1_000usize, 10_000usize] {
        let mut map = HeadlessMap::new();
        let (catalog, mut store) = build_catalog(point_count, &mut map);
        let mut filters = VisibilityFilters::new();

        group.bench_function(BenchmarkId::new("points_category", point_count), |b| {
            b.iter(|| {
                let shown =
                    filters.toggle_category(FilterCategory::Points, &catalog, &mut store, &mut map);
                black_box(shown)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_zone_metrics, bench_visibility_toggle);
criterion_main!(benches);
