use criterion::{criterion_group, criterion_main, Criterion};
use epimatch::{ratio, symmetry, verify, KeyPoint, MatcherConfig};
use space::Neighbor;

fn synthetic_candidates(count: usize) -> Vec<Vec<Neighbor<u32>>> {
    (0..count)
        .map(|i| {
            vec![
                Neighbor {
                    index: i,
                    distance: (i % 40) as u32,
                },
                Neighbor {
                    index: (i + 1) % count,
                    distance: 60 + (i % 25) as u32,
                },
            ]
        })
        .collect()
}

fn translation_scene() -> (Vec<KeyPoint>, Vec<KeyPoint>, Vec<[usize; 2]>) {
    let keypoint = |x: f32, y: f32| KeyPoint {
        point: (x, y),
        response: 1.0,
        size: 1.0,
        octave: 0,
        angle: 0.0,
    };
    let mut keypoints_a = Vec::new();
    let mut keypoints_b = Vec::new();
    for i in 0..200usize {
        let x = 20.0 + (i % 20) as f32 * 30.0 + ((i * 7) % 11) as f32;
        let y = 20.0 + (i / 20) as f32 * 45.0 + ((i * 13) % 17) as f32;
        keypoints_a.push(keypoint(x, y));
        keypoints_b.push(keypoint(x + 25.0, y));
    }
    let matches = (0..keypoints_a.len()).map(|i| [i, i]).collect();
    (keypoints_a, keypoints_b, matches)
}

fn bench_filters(c: &mut Criterion) {
    let forward = synthetic_candidates(500);
    let reverse = synthetic_candidates(500);
    c.bench_function("ratio_filter", |b| {
        b.iter(|| ratio::filter(&mut forward.clone(), 0.65))
    });
    c.bench_function("symmetry_filter", |b| {
        b.iter(|| symmetry::filter(&forward, &reverse))
    });
}

fn bench_verification(c: &mut Criterion) {
    let (keypoints_a, keypoints_b, matches) = translation_scene();
    let config = MatcherConfig::default();
    c.bench_function("epipolar_inliers", |b| {
        b.iter(|| verify::epipolar_inliers(&matches, &keypoints_a, &keypoints_b, &config))
    });
}

criterion_group!(
    name = pipeline;
    config = Criterion::default().sample_size(10);
    targets = bench_filters, bench_verification
);

criterion_main!(pipeline);
