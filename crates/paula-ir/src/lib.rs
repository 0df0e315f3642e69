//! Song model for the paula MOD player.
//!
//! This crate defines the immutable data decoded from a ProTracker
//! module. The decoder in `paula-formats` builds it once; the playback
//! engine in `paula-engine` only ever reads it.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod effects;
mod instrument;
mod pattern;
mod song;

pub use effects::Effect;
pub use instrument::Instrument;
pub use pattern::{Pattern, Row, CHANNELS_PER_PATTERN, ROWS_PER_PATTERN};
pub use song::{Song, ORDER_ENTRIES};
