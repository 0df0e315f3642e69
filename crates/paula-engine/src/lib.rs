//! Synthesis engine for the paula MOD player.
//!
//! Walks a decoded song at its musical clock (sample -> tick -> row ->
//! pattern -> order) and mixes four channel synthesizers into a stereo
//! 16-bit stream at 44,100 Hz.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod channel;
mod engine;
mod frame;
mod resampler;
mod timing;
mod vibrato;

pub use channel::{Channel, Pan};
pub use engine::{Engine, PlaybackPosition};
pub use frame::Frame;
pub use resampler::Resampler;
pub use timing::{
    fine_tuned_period, period_to_step, RowTiming, DEFAULT_BPM, DEFAULT_TICKS_PER_ROW,
    FINE_TUNE_BASE, PAL_CLOCK, PERIOD_MAX, PERIOD_MIN, SAMPLE_RATE,
};
pub use vibrato::SINE_TABLE;
