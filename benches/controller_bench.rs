//! Controller Benchmarks
//!
//! Performance benchmarks for the per-frame work using Criterion.

use chess_board_controller::core::ControllerConfig;
use chess_board_controller::game::{PlayMode, Session};
use chess_board_controller::rendering::bitboard::{classify_pair, squares_of};
use chess_board_controller::rendering::{OverlayMode, RenderOptions, SpriteAtlas};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use native_engine::NativeEngine;

fn session() -> Session<NativeEngine> {
    let config = ControllerConfig {
        play_mode: PlayMode::HumanVsHuman,
        ..Default::default()
    };
    match Session::start(NativeEngine::new(), &config) {
        Ok(session) => session,
        Err(e) => panic!("engine failed to start: {e}"),
    }
}

fn bench_squares_of(c: &mut Criterion) {
    c.bench_function("squares_of_full_board", |b| {
        b.iter(|| squares_of(black_box(u64::MAX)).map(|sq| sq.index() as u32).sum::<u32>())
    });
}

fn bench_classify_pair(c: &mut Criterion) {
    c.bench_function("classify_pair_start_position", |b| {
        b.iter(|| classify_pair(black_box(0xFFFF), black_box(0xFFFF_0000_0000_0000)))
    });
}

fn bench_frame_plain(c: &mut Criterion) {
    let mut session = session();
    let atlas = SpriteAtlas::standard();

    c.bench_function("frame_start_position", |b| {
        b.iter(|| black_box(session.frame(&atlas, RenderOptions::default()).is_ok()))
    });
}

fn bench_frame_attack_overlay(c: &mut Criterion) {
    let mut session = session();
    session.set_overlay(OverlayMode::Attacks);
    let atlas = SpriteAtlas::standard();
    let options = RenderOptions { show_labels: true };

    c.bench_function("frame_attack_overlay_with_labels", |b| {
        b.iter(|| black_box(session.frame(&atlas, options).is_ok()))
    });
}

criterion_group!(
    benches,
    bench_squares_of,
    bench_classify_pair,
    bench_frame_plain,
    bench_frame_attack_overlay
);
criterion_main!(benches);
