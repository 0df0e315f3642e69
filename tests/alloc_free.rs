//! Allocation-free render path test.
//!
//! Verifies that `Engine::render_frame()` does not allocate once
//! playback is running. Renders a real fixture for several seconds to
//! cover note triggers, effect state changes, and row transitions.
//!
//! Just run `cargo test` — no feature flags needed.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use paula_engine::Engine;
use std::fs;
use std::path::PathBuf;

fn load_engine(name: &str) -> Engine {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/mod")
        .join(name);
    let data = fs::read(path).unwrap();
    Engine::new(paula_formats::load_mod(&data).unwrap())
}

#[test]
fn intro_render_is_alloc_free() {
    let mut engine = load_engine("intro.mod");
    assert_no_alloc(|| {
        for _ in 0..44_100 * 2 {
            engine.render_frame();
        }
    });
}

#[test]
fn silence_render_is_alloc_free() {
    let mut engine = load_engine("silence.mod");
    assert_no_alloc(|| {
        while !engine.is_finished() {
            engine.render_frame();
        }
    });
}
