//! End-to-end test: load fixture -> engine -> frames -> verify output.

use paula_engine::Engine;
use paula_formats::load_mod;
use std::fs;
use std::path::PathBuf;

const SAMPLES_PER_ROW: usize = 882;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/mod")
}

fn load_engine(name: &str) -> Engine {
    let data = fs::read(fixtures_dir().join(name)).unwrap();
    Engine::new(load_mod(&data).unwrap())
}

fn render_all(engine: &mut Engine, cap: usize) -> Vec<paula_engine::Frame> {
    let mut frames = Vec::new();
    while !engine.is_finished() {
        frames.push(engine.render_frame());
        assert!(frames.len() <= cap, "song did not terminate within {} frames", cap);
    }
    frames
}

// --- silence.mod ---

#[test]
fn silent_module_renders_exact_silent_frames() {
    let mut engine = load_engine("silence.mod");
    let frames = render_all(&mut engine, 3 * 64 * SAMPLES_PER_ROW);

    // 2 used positions x 64 rows x 882 samples
    assert_eq!(frames.len(), 2 * 64 * SAMPLES_PER_ROW);
    assert!(frames.iter().all(|f| f.is_silent()));
}

// --- intro.mod ---

#[test]
fn intro_has_expected_length() {
    let mut engine = load_engine("intro.mod");
    let frames = render_all(&mut engine, 3 * 64 * SAMPLES_PER_ROW);
    // Two patterns, no speed or flow effects
    assert_eq!(frames.len(), 2 * 64 * SAMPLES_PER_ROW);
}

#[test]
fn intro_renders_nonsilent_audio() {
    let mut engine = load_engine("intro.mod");
    let frames = engine.render_frames(44_100);
    assert!(
        frames.iter().any(|f| !f.is_silent()),
        "expected audible output in the first second"
    );
}

#[test]
fn intro_uses_both_stereo_sides() {
    let mut engine = load_engine("intro.mod");
    let frames = engine.render_frames(44_100);
    assert!(frames.iter().any(|f| f.left != 0), "left side never sounded");
    assert!(frames.iter().any(|f| f.right != 0), "right side never sounded");
}

#[test]
fn intro_has_meaningful_amplitude() {
    let mut engine = load_engine("intro.mod");
    let frames = engine.render_frames(44_100);
    let max = frames
        .iter()
        .flat_map(|f| [f.left.unsigned_abs(), f.right.unsigned_abs()])
        .max()
        .unwrap();
    assert!(max > 100, "max amplitude {} too low for real playback", max);
}

#[test]
fn solo_isolates_one_channel() {
    let mut engine = load_engine("intro.mod");
    // Channel 1 (the lead) pans right
    engine.set_solo(&[1]);
    let frames = engine.render_frames(44_100);
    assert!(frames.iter().all(|f| f.left == 0));
    assert!(frames.iter().any(|f| f.right != 0));
}

#[test]
fn position_advances_through_orders() {
    let mut engine = load_engine("intro.mod");
    assert_eq!(engine.position().order, 0);

    engine.render_frames(64 * SAMPLES_PER_ROW);
    assert_eq!(engine.position().order, 1);
    assert_eq!(engine.position().pattern, 1);
}

#[test]
fn playback_is_deterministic() {
    let mut a = load_engine("intro.mod");
    let mut b = load_engine("intro.mod");
    for _ in 0..10_000 {
        assert_eq!(a.render_frame(), b.render_frame());
    }
}
