//! Frame-render throughput benchmark.

use criterion::{criterion_group, criterion_main, Criterion};
use paula_engine::Engine;
use paula_ir::{Effect, Instrument, Pattern, Row, Song};

/// A busy 4-channel song: looped instruments on every channel with a
/// mix of per-tick and per-sample effects.
fn busy_song() -> Song {
    let mut inst = Instrument::new("saw");
    inst.waveform = (0..4096).map(|i| (i % 256) as i8).collect();
    inst.repeat_length_words = 2048;
    let mut instruments = vec![Instrument::default(); 31];
    instruments[0] = inst;

    let mut pattern = Pattern::new();
    for row in 0..64 {
        for ch in 0..4 {
            let effect = match (row + ch) % 4 {
                0 => Effect::Arpeggio { x: 4, y: 7 },
                1 => Effect::Vibrato { speed: 8, depth: 6 },
                2 => Effect::VolumeSlide(-1),
                _ => Effect::None,
            };
            *pattern.row_mut(row, ch) = Row {
                instrument: if row % 8 == 0 { 1 } else { 0 },
                period: if row % 8 == 0 { 428 } else { 0 },
                effect,
            };
        }
    }

    let mut order = [0u8; 128];
    order[0] = 0;
    Song {
        title: Default::default(),
        order,
        used_positions: 1,
        restart_position: 0,
        instruments,
        patterns: vec![pattern],
    }
}

fn bench_render(c: &mut Criterion) {
    c.bench_function("render_one_second", |b| {
        b.iter_batched(
            || Engine::new(busy_song()),
            |mut engine| {
                for _ in 0..44_100 {
                    std::hint::black_box(engine.render_frame());
                }
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
