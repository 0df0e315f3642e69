//! ProTracker MOD decoder for the paula player.
//!
//! Parses the binary "M.K." module layout into the immutable song model.

mod mod_format;

pub use mod_format::{load_mod, signed_nibble, MOD_MAGIC};

/// Error type for module decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The byte stream ended short of a declared size
    TruncatedModule,
    /// The identifier at offset 1080 is not "M.K."
    UnsupportedFormat,
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::TruncatedModule => write!(f, "module data is truncated"),
            DecodeError::UnsupportedFormat => {
                write!(f, "not a 4-channel M.K. module")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

extern crate alloc;
