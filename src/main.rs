//! Tileworld Demo
//!
//! Runs the world core headless: builds (or loads) a map, spawns the
//! configured population, simulates a few seconds of scripted input and
//! verifies the run replays to the same state hash.
//!
//! Usage: `tileworld [CONFIG.json] [LAYER.txt]`

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tileworld::{
    DeterministicRng, InputFrame, VERSION, WorldConfig,
    game::{
        entity::DrawList,
        map::{TileGeometry, TileLayer, TileMap, TileSet},
        world::{replay, World},
    },
};

/// Tile edge length used by the demo tile set
const TILE_SIZE: f32 = 16.0;
/// Walkable floor tile
const FLOOR: i32 = 0;
/// Solid wall tile
const WALL: i32 = 1;
/// Frames to simulate (10 seconds at 60 Hz)
const DEMO_FRAMES: u32 = 600;

fn main() -> Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Tileworld v{}", VERSION);

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => WorldConfig::from_path(&path)
            .with_context(|| format!("loading config {path}"))?,
        None => WorldConfig::default(),
    };
    let map = match args.next() {
        Some(path) => TileMap::new(
            TileLayer::from_path(&path).with_context(|| format!("loading layer {path}"))?,
            TileSet::new(TILE_SIZE, [FLOOR])?,
        ),
        None => demo_map(config.seed)?,
    };

    info!("Frame rate: {} Hz, bucket size: {}", config.frame_rate, config.bucket_size);
    info!("Map: {}x{} tiles ({} world units)", map.map_size().0, map.map_size().1, map.world_size());

    demo_run(config, map)
}

/// Open field with a wall border and scattered pillars away from the
/// spawn area.
fn demo_map(seed: u64) -> Result<TileMap> {
    let (columns, rows) = (400, 80);
    let mut layer = TileLayer::filled(columns, rows, FLOOR);

    for x in 0..columns {
        layer.set_tile(x, 0, WALL);
        layer.set_tile(x, rows - 1, WALL);
    }
    for y in 0..rows {
        layer.set_tile(0, y, WALL);
        layer.set_tile(columns - 1, y, WALL);
    }

    let mut rng = DeterministicRng::new(seed);
    for _ in 0..600 {
        let x = 1 + rng.next_int(columns as u32 - 2) as usize;
        let y = 20 + rng.next_int(rows as u32 - 21) as usize;
        layer.set_tile(x, y, WALL);
    }

    Ok(TileMap::new(layer, TileSet::new(TILE_SIZE, [FLOOR])?))
}

/// Scripted stick: sweeps slowly around the circle.
fn scripted_input(frame: u32) -> InputFrame {
    let angle = frame as f32 * 0.01;
    InputFrame::with_movement((angle.cos() * 127.0) as i8, (angle.sin() * 127.0) as i8)
}

fn demo_run(config: WorldConfig, map: TileMap) -> Result<()> {
    info!("=== Starting Demo Run ===");

    let mut world = World::new(config.clone(), map.clone())?;
    world.populate()?;

    let inputs: Vec<InputFrame> = (0..DEMO_FRAMES).map(scripted_input).collect();
    let elapsed = config.frame_duration();

    let mut total_moved = 0;
    let mut total_rejected = 0;
    for (frame, input) in inputs.iter().enumerate() {
        let stats = world.update(*input, elapsed);
        total_moved += stats.moved;
        total_rejected += stats.rejected;

        // Report every second
        if frame % config.frame_rate as usize == 0 {
            let player = world
                .followed()
                .and_then(|id| world.position_of(id))
                .unwrap_or_default();
            info!(
                "Frame {}: player {}, camera {}, {} buckets, {} moved, {} rejected",
                frame,
                player,
                world.camera().position,
                stats.buckets,
                stats.moved,
                stats.rejected
            );
        }
    }

    let mut draws = DrawList::default();
    world.render(&mut draws);

    info!("=== Run Results ===");
    info!("Frames: {}", world.frame());
    info!("Moves committed: {}, rejected: {}", total_moved, total_rejected);
    info!("Sprites drawn: {}", draws.commands.len());

    let hash = world.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    info!("=== Verifying Determinism ===");
    let mut replay_world = World::new(config, map)?;
    replay_world.populate()?;
    replay(&mut replay_world, &inputs);
    let replay_hash = replay_world.compute_hash();

    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
        Ok(())
    } else {
        anyhow::bail!("determinism failure: hashes differ")
    }
}
