//! Fractional-position waveform reader with linear interpolation.

use paula_ir::Instrument;

use crate::timing::period_to_step;

/// Initial read position. The first waveform word holds loop metadata
/// and is never played.
pub const START_POS: f64 = 2.0;

/// Reads an instrument's 8-bit waveform at a fractional position,
/// advancing by a period-derived step per output sample.
///
/// Interpolation distributes the distance between two adjacent waveform
/// bytes over the whole run of output samples that share the same
/// integer index, which stays smooth whether the step is below 1.0
/// (upsampling) or above it (downsampling).
#[derive(Clone, Copy, Debug)]
pub struct Resampler {
    pos: f64,
    step: f64,
    exhausted: bool,
}

impl Resampler {
    pub fn new() -> Self {
        Self {
            pos: START_POS,
            step: 0.0,
            exhausted: false,
        }
    }

    /// Rewind to the start of the waveform (note trigger or rebind).
    pub fn reset(&mut self) {
        self.pos = START_POS;
        self.exhausted = false;
    }

    /// Place the read position directly (instrument offset effect).
    pub fn set_position(&mut self, pos: f64) {
        self.pos = pos;
        self.exhausted = false;
    }

    pub fn position(&self) -> f64 {
        self.pos
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Derive the per-sample step from an effective period.
    pub fn recalculate_step(&mut self, period: f64) {
        self.step = period_to_step(period);
    }

    /// Produce one interpolated sample in about [-1.0, 1.0] and advance.
    ///
    /// A non-looped instrument goes silent once the position passes the
    /// end of its waveform; a looped one wraps to the loop start,
    /// keeping the fractional part of the position.
    pub fn next_sample(&mut self, inst: &Instrument) -> f64 {
        if self.exhausted || self.step <= 0.0 || inst.waveform.is_empty() {
            return 0.0;
        }
        let len = inst.waveform.len() as f64;
        if self.pos >= len && !self.wrap(inst, len) {
            return 0.0;
        }

        let i = libm::floor(self.pos) as usize;
        let s0 = byte_at(inst, i);
        let s1 = if i + 1 < inst.waveform.len() {
            byte_at(inst, i + 1)
        } else if inst.is_looped() {
            byte_at(inst, inst.repeat_start())
        } else {
            0.0
        };

        // How many output samples share this integer index, derived
        // from the step and the fractional position.
        let frac = self.pos - i as f64;
        let steps_passed = libm::floor(frac / self.step);
        let steps_remaining = libm::floor((i as f64 + 1.0 - self.pos) / self.step);
        let run = steps_remaining + steps_passed + 1.0;
        let value = s0 + (s1 - s0) * steps_passed / run;

        self.pos += self.step;
        if self.pos >= len {
            self.wrap(inst, len);
        }
        value
    }

    /// Handle a position at or past the waveform end. Returns false
    /// once a non-looped instrument is exhausted.
    fn wrap(&mut self, inst: &Instrument, len: f64) -> bool {
        if inst.is_looped() {
            let frac = self.pos - libm::floor(self.pos);
            self.pos = inst.repeat_start() as f64 + frac;
            self.pos < len
        } else {
            self.exhausted = true;
            false
        }
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new()
    }
}

fn byte_at(inst: &Instrument, index: usize) -> f64 {
    inst.waveform[index] as f64 / 128.0
}
