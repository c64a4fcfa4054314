use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hex_rules::{search, EngineConfig, HexPos, ObjectType, RuleEngine, TextType, World};

const VOCAB: [TextType; 12] = [
    TextType::Wall,
    TextType::Is,
    TextType::Stop,
    TextType::And,
    TextType::Rock,
    TextType::Push,
    TextType::I,
    TextType::Am,
    TextType::Blue,
    TextType::Can,
    TextType::Swim,
    TextType::Water,
];

/// Every cell holds a word, some hold two.
fn dense_world(size: i32) -> World {
    let mut world = World::new(size, size);
    for r in 0..size {
        for q in 0..size {
            let pos = HexPos::new(q, r);
            let i = (q * 7 + r * 13) as usize;
            world.place_word(VOCAB[i % VOCAB.len()], pos).ok();
            if (q + r) % 5 == 0 {
                world.place_word(VOCAB[(i + 5) % VOCAB.len()], pos).ok();
            }
        }
    }
    world
}

/// Rows of `WALL IS STOP AND PUSH` over a field of objects.
fn level(size: i32) -> World {
    let mut world = World::new(size, size);
    let sentence = [TextType::Wall, TextType::Is, TextType::Stop, TextType::And, TextType::Push];
    for r in (0..size).step_by(3) {
        for (q, &word) in sentence.iter().enumerate() {
            world.place_word(word, HexPos::new(q as i32, r)).ok();
        }
    }
    for r in 0..size {
        for q in 0..size {
            world.place_object(ObjectType::Wall, HexPos::new(q, r)).ok();
        }
    }
    world
}

fn bench_search_dense_16(c: &mut Criterion) {
    let world = dense_world(16);
    let config = EngineConfig::default();
    c.bench_function("search_dense_16", |b| {
        b.iter(|| search(black_box(&world), &config))
    });
}

fn bench_search_dense_32(c: &mut Criterion) {
    let world = dense_world(32);
    let config = EngineConfig::default();
    c.bench_function("search_dense_32", |b| {
        b.iter(|| search(black_box(&world), &config))
    });
}

fn bench_tick_level_24(c: &mut Criterion) {
    let world = level(24);
    c.bench_function("tick_level_24", |b| {
        b.iter(|| {
            let mut world = world.clone();
            let mut engine = RuleEngine::new(EngineConfig::default()).ok()?;
            Some(engine.tick(black_box(&mut world), Duration::from_millis(16)))
        })
    });
}

criterion_group!(
    benches,
    bench_search_dense_16,
    bench_search_dense_32,
    bench_tick_level_24,
);
criterion_main!(benches);
