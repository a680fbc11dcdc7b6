// benches/intersection_benchmark.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use glam::{Mat4, Vec3};
use haunted_walkthrough::engine_lib::collision::{probe, CollisionMesh, Triangle, TriangleIntersection};
use rand::Rng;

fn random_point(rng: &mut impl Rng, extent: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
    )
}

// Small triangles scattered through a cube, roughly what a furnished house looks like to a probe.
fn random_soup(rng: &mut impl Rng, triangle_count: usize) -> CollisionMesh {
    let triangles: Vec<Triangle> = (0..triangle_count)
        .map(|_| {
            let anchor = random_point(rng, 50.0);
            Triangle::new(anchor, anchor + random_point(rng, 1.0), anchor + random_point(rng, 1.0))
        })
        .collect();
    CollisionMesh::from_triangles(&triangles)
}

fn probe_benchmark_fn(c: &mut Criterion) {
    let mut rng = rand::thread_rng();

    const SOUP_TRIANGLES: usize = 20_000;
    let soup = random_soup(&mut rng, SOUP_TRIANGLES);
    let placement = Mat4::from_translation(Vec3::new(0.4, -0.3, -49.6)) * Mat4::from_scale(Vec3::splat(0.1));
    let world = soup.to_world(&placement);

    const NUM_BENCH_RAYS: usize = 100;
    let rays: Vec<(Vec3, Vec3)> = (0..NUM_BENCH_RAYS)
        .map(|_| (random_point(&mut rng, 50.0), random_point(&mut rng, 1.0).normalize_or_zero()))
        .collect();

    let mut group = c.benchmark_group("ProbeOperations");

    group.bench_function("ray_triangle_single", |b| {
        let tri = Triangle::new(Vec3::new(-1.0, -1.0, -5.0), Vec3::new(1.0, -1.0, -5.0), Vec3::new(0.0, 1.0, -5.0));
        b.iter(|| TriangleIntersection::ray_triangle(black_box(Vec3::ZERO), black_box(Vec3::NEG_Z), black_box(&tri)))
    });

    group.bench_function("probe_world_space_20k_triangles", |b| {
        let mut ray_iter = rays.iter().cycle();
        b.iter(|| {
            let (origin, direction) = ray_iter.next().unwrap();
            probe(black_box(*origin), black_box(*direction), 0.5, black_box(&world), None)
        })
    });

    group.bench_function("probe_with_transform_20k_triangles", |b| {
        let mut ray_iter = rays.iter().cycle();
        b.iter(|| {
            let (origin, direction) = ray_iter.next().unwrap();
            probe(black_box(*origin), black_box(*direction), 0.5, black_box(&soup), Some(&placement))
        })
    });

    group.bench_function("four_way_probe_20k_triangles", |b| {
        let mut ray_iter = rays.iter().cycle();
        b.iter(|| {
            let (origin, front) = ray_iter.next().unwrap();
            let right = front.cross(Vec3::Y).normalize_or_zero();
            [*front, -*front, -right, right]
                .map(|dir| probe(black_box(*origin), dir, 0.5, black_box(&world), None))
        })
    });
    group.finish();
}

criterion_group!(benches, probe_benchmark_fn);
criterion_main!(benches);
