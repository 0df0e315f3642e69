//! Clock constants and pitch math.
//!
//! Pitch comes from the PAL Amiga clock: an instrument played at
//! period p produces bytes at `PAL_CLOCK / (p * 2)` Hz, which the
//! resampler converts into a fractional step against the fixed
//! 44,100 Hz output rate.

/// PAL Amiga master clock in Hz.
pub const PAL_CLOCK: f64 = 7_093_789.2;

/// Output sample rate in Hz.
pub const SAMPLE_RATE: f64 = 44_100.0;

/// Lowest playable period (highest pitch).
pub const PERIOD_MIN: f64 = 113.0;

/// Highest playable period (lowest pitch).
pub const PERIOD_MAX: f64 = 856.0;

/// One eighth of a semitone: the ratio a single fine-tune unit divides
/// the period by.
pub const FINE_TUNE_BASE: f64 = 1.007246412;

/// Default tempo.
pub const DEFAULT_BPM: u8 = 125;

/// Default ticks per row.
pub const DEFAULT_TICKS_PER_ROW: u8 = 6;

/// Resampler step for an effective period: source rate over output rate.
/// A period of zero (no note yet) yields a zero step, which keeps the
/// resampler silent.
pub fn period_to_step(period: f64) -> f64 {
    if period <= 0.0 {
        return 0.0;
    }
    (PAL_CLOCK / (period * 2.0)) / SAMPLE_RATE
}

/// Apply a fine-tune to a raw period. Positive fine-tune lowers the
/// period (raises pitch) by `fine_tune` eighths of a semitone.
pub fn fine_tuned_period(period: f64, fine_tune: i8) -> f64 {
    period / libm::pow(FINE_TUNE_BASE, fine_tune as f64)
}

/// Period shifted up by whole semitones (for arpeggio).
pub fn semitone_shifted_period(period: f64, semitones: u8) -> f64 {
    period / libm::pow(FINE_TUNE_BASE, 8.0 * semitones as f64)
}

/// The row/tick clock derived from BPM and ticks-per-row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowTiming {
    /// Tempo (32-255)
    pub bpm: u8,
    /// Ticks per row (1-31)
    pub ticks_per_row: u8,
}

impl Default for RowTiming {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            ticks_per_row: DEFAULT_TICKS_PER_ROW,
        }
    }
}

impl RowTiming {
    /// Output samples per pattern row: 882.0 at the default 125 BPM.
    pub fn samples_per_row(&self) -> f64 {
        (SAMPLE_RATE * 5.0) / (self.bpm as f64 * 2.0)
    }

    /// Output samples per tick: 147.0 at the defaults.
    pub fn samples_per_tick(&self) -> f64 {
        self.samples_per_row() / self.ticks_per_row as f64
    }
}
