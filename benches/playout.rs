//! Benchmarks for complete random playouts and engine cloning.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rust_morris::core::{GameRng, MorrisConfig};
use rust_morris::playout::{run_playout, run_playouts, MillSeekingPolicy, UniformPolicy};
use rust_morris::rules::TurnEngine;

fn bench_uniform_playout(c: &mut Criterion) {
    let config = MorrisConfig::nine_mens_morris();

    c.bench_function("playout_uniform_9mm", |b| {
        let mut seed = 0;
        b.iter(|| {
            seed += 1;
            let mut engine = TurnEngine::new(config).unwrap();
            let mut rng = GameRng::new(seed);
            black_box(run_playout(&mut engine, &UniformPolicy, &mut rng, 500))
        });
    });
}

fn bench_mill_seeking_playout(c: &mut Criterion) {
    let config = MorrisConfig::nine_mens_morris();

    c.bench_function("playout_mill_seeking_9mm", |b| {
        let mut seed = 0;
        b.iter(|| {
            seed += 1;
            let mut engine = TurnEngine::new(config).unwrap();
            let mut rng = GameRng::new(seed);
            black_box(run_playout(&mut engine, &MillSeekingPolicy, &mut rng, 500))
        });
    });
}

fn bench_six_mens_batch(c: &mut Criterion) {
    let config = MorrisConfig::six_mens_morris();

    c.bench_function("playout_batch_6mm_x16", |b| {
        let mut rng = GameRng::new(1);
        b.iter(|| black_box(run_playouts(config, &UniformPolicy, &mut rng, 16, 300).unwrap()));
    });
}

fn bench_engine_clone(c: &mut Criterion) {
    let mut engine = TurnEngine::new(MorrisConfig::nine_mens_morris()).unwrap();
    let mut rng = GameRng::new(7);
    run_playout(&mut engine, &UniformPolicy, &mut rng, 30);

    c.bench_function("engine_clone_midgame", |b| {
        b.iter(|| black_box(engine.clone()));
    });
}

criterion_group!(
    benches,
    bench_uniform_playout,
    bench_mill_seeking_playout,
    bench_six_mens_batch,
    bench_engine_clone
);
criterion_main!(benches);
