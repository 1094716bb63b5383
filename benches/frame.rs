//! Frame update benchmarks.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use tileworld::game::bucket::BucketIndex;
use tileworld::game::map::{TileLayer, TileMap, TileSet};
use tileworld::{InputFrame, Rect, Vec2, World, WorldConfig};

const FRAME: Duration = Duration::from_nanos(16_666_666);

fn open_map() -> TileMap {
    TileMap::new(
        TileLayer::filled(400, 80, 0),
        TileSet::new(16.0, [0]).expect("valid tile set"),
    )
}

fn bench_full_frame(c: &mut Criterion) {
    let mut world = World::new(WorldConfig::default(), open_map()).expect("valid config");
    world.populate().expect("valid population");

    c.bench_function("frame_10k_entities", |b| {
        b.iter(|| black_box(world.update(InputFrame::with_movement(64, 0), FRAME)))
    });
}

fn bench_bucket_rebuild(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let rects: Vec<Rect> = (0..10_000)
        .map(|_| Rect::new(rng.gen_range(0.0..6400.0), rng.gen_range(0.0..1280.0), 8.0, 8.0))
        .collect();
    let mut index = BucketIndex::new(32.0);

    c.bench_function("bucket_rebuild_10k", |b| {
        b.iter(|| {
            index.clear();
            for (id, rect) in rects.iter().enumerate() {
                index.insert(id, rect);
            }
            black_box(index.query(&Rect::from_corner(Vec2::new(3200.0, 640.0), Vec2::splat(64.0))))
        })
    });
}

criterion_group!(benches, bench_full_frame, bench_bucket_rebuild);
criterion_main!(benches);
