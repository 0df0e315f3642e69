//! Instrument data types.

use alloc::vec::Vec;
use arrayvec::ArrayString;

/// An instrument: a named 8-bit waveform with loop and tuning defaults.
///
/// Lengths and loop bounds are kept in 16-bit words, as the MOD format
/// stores them; byte offsets are always `words * 2`.
#[derive(Clone, Debug)]
pub struct Instrument {
    /// Instrument name
    pub name: ArrayString<22>,
    /// Default fine-tune (-8 to +7, eighths of a semitone)
    pub fine_tune: i8,
    /// Default volume (0-64)
    pub volume: u8,
    /// Loop start offset, in words
    pub repeat_start_words: u16,
    /// Loop length, in words
    pub repeat_length_words: u16,
    /// Signed 8-bit waveform, `length_words() * 2` bytes
    pub waveform: Vec<i8>,
}

impl Default for Instrument {
    fn default() -> Self {
        Self {
            name: ArrayString::new(),
            fine_tune: 0,
            volume: 64,
            repeat_start_words: 0,
            repeat_length_words: 0,
            waveform: Vec::new(),
        }
    }
}

impl Instrument {
    /// Create a new empty instrument.
    pub fn new(name: &str) -> Self {
        let mut inst = Self::default();
        let _ = inst.name.try_push_str(name);
        inst
    }

    /// Waveform length in 16-bit words.
    pub fn length_words(&self) -> u16 {
        (self.waveform.len() / 2) as u16
    }

    /// Returns true if the instrument has waveform data to play.
    pub fn has_waveform(&self) -> bool {
        !self.waveform.is_empty()
    }

    /// Returns true if playback wraps back to the loop start at the end
    /// of the waveform. A repeat length of one word means "no loop".
    pub fn is_looped(&self) -> bool {
        self.repeat_length_words > 1
    }

    /// Loop start offset in bytes.
    pub fn repeat_start(&self) -> usize {
        self.repeat_start_words as usize * 2
    }
}
