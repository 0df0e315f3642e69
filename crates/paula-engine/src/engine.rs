//! The song scheduler and mixer.
//!
//! A tight loop alternates between advancing the musical clock
//! (sample -> tick -> row -> pattern -> order) and producing one stereo
//! frame. Row transitions for frame N are applied before frame N's
//! channel sampling; no reordering.

use alloc::vec::Vec;
use paula_ir::{Effect, Song, CHANNELS_PER_PATTERN, ROWS_PER_PATTERN};

use crate::channel::Channel;
use crate::frame::Frame;
use crate::timing::RowTiming;

/// Sentinel in `next_row` marking the end of the song.
const SONG_END: i32 = -1;

/// Where playback currently stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackPosition {
    pub order: usize,
    pub pattern: usize,
    pub row: usize,
}

/// Drives four channel synthesizers through a song.
///
/// The lookahead trio (`next_row`, `next_row_pattern`,
/// `next_order_position`) is computed when a row is entered, because
/// pattern breaks and position jumps must take effect before tick 0
/// sample 0 of the following row. Keep them separate from the current
/// cursor.
pub struct Engine {
    song: Song,
    channels: [Channel; CHANNELS_PER_PATTERN],
    timing: RowTiming,

    order_position: usize,
    current_pattern: usize,
    row_position: usize,
    tick_position: u32,
    sample_position: u32,

    next_row: i32,
    next_row_pattern: usize,
    next_order_position: usize,

    /// When set, only flagged channels are audible
    solo: Option<[bool; CHANNELS_PER_PATTERN]>,
    finished: bool,
}

impl Engine {
    /// Create an engine positioned at the start of the song.
    pub fn new(song: Song) -> Self {
        let finished = song.used_positions == 0 || song.patterns.is_empty();
        let current_pattern = if finished { 0 } else { song.pattern_at(0) as usize };

        Self {
            song,
            channels: core::array::from_fn(Channel::new),
            timing: RowTiming::default(),
            order_position: 0,
            current_pattern,
            row_position: 0,
            tick_position: 0,
            sample_position: 0,
            next_row: 0,
            next_row_pattern: current_pattern,
            next_order_position: 0,
            solo: None,
            finished,
        }
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    pub fn position(&self) -> PlaybackPosition {
        PlaybackPosition {
            order: self.order_position,
            pattern: self.current_pattern,
            row: self.row_position,
        }
    }

    /// Returns true once the last row has finished sounding.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn timing(&self) -> RowTiming {
        self.timing
    }

    /// Restrict output to the given channels. An empty list plays all.
    pub fn set_solo(&mut self, channels: &[usize]) {
        if channels.is_empty() {
            self.solo = None;
        } else {
            let mut mask = [false; CHANNELS_PER_PATTERN];
            for &ch in channels {
                if ch < CHANNELS_PER_PATTERN {
                    mask[ch] = true;
                }
            }
            self.solo = Some(mask);
        }
    }

    /// Generate one stereo frame, advancing the clock.
    pub fn render_frame(&mut self) -> Frame {
        #[cfg(feature = "alloc_check")]
        {
            assert_no_alloc::assert_no_alloc(|| self.render_frame_inner())
        }
        #[cfg(not(feature = "alloc_check"))]
        {
            self.render_frame_inner()
        }
    }

    /// Render multiple frames, returning a new Vec (offline rendering).
    pub fn render_frames(&mut self, count: usize) -> Vec<Frame> {
        (0..count).map(|_| self.render_frame()).collect()
    }

    fn render_frame_inner(&mut self) -> Frame {
        if self.finished {
            return Frame::silence();
        }

        if self.sample_position == 0 {
            if self.tick_position == 0 {
                self.enter_row();
            } else {
                for ch in &mut self.channels {
                    ch.apply_tick_effects(self.tick_position);
                }
            }
        }

        let frame = self.mix_channels();

        self.sample_position += 1;
        if self.sample_position as f64 >= self.timing.samples_per_tick() {
            self.sample_position = 0;
            self.tick_position += 1;
            if self.tick_position >= self.timing.ticks_per_row as u32 {
                self.tick_position = 0;
                self.advance_row();
            }
        }

        frame
    }

    /// Start of a row: apply speed changes, dispatch the row to the
    /// channels, run row-start effects, then compute the lookahead.
    fn enter_row(&mut self) {
        let pattern = &self.song.patterns[self.current_pattern];
        let rows = pattern.row_channels(self.row_position);

        // Speed first, so this row already runs at the new pace. When
        // several channels carry one, the last wins.
        for row in rows {
            match row.effect {
                Effect::SetSpeed(v) if v > 0 => self.timing.ticks_per_row = v,
                Effect::SetTempo(v) => self.timing.bpm = v,
                _ => {}
            }
        }

        for (ch, row) in self.channels.iter_mut().zip(rows) {
            ch.set_row(row, &self.song.instruments, &self.timing);
            ch.apply_row_effects();
        }

        self.compute_lookahead();
    }

    /// Decide where the song goes after the current row.
    fn compute_lookahead(&mut self) {
        let pattern = &self.song.patterns[self.current_pattern];

        let mut break_row = None;
        let mut jump_order = None;
        for row in pattern.row_channels(self.row_position) {
            match row.effect {
                Effect::PatternBreak(r) => break_row = Some(r as usize),
                Effect::PositionJump(p) => jump_order = Some(p as usize),
                _ => {}
            }
        }

        let last_row = self.row_position + 1 >= ROWS_PER_PATTERN;
        if break_row.is_none() && jump_order.is_none() && !last_row {
            self.next_row = self.row_position as i32 + 1;
            self.next_row_pattern = self.current_pattern;
            self.next_order_position = self.order_position;
            return;
        }

        // Leaving the pattern, by falling off the end or by request.
        let next_order = jump_order.unwrap_or(self.order_position + 1);
        if next_order >= self.song.used_positions as usize {
            self.next_row = SONG_END;
            return;
        }
        self.next_row = break_row.unwrap_or(0) as i32;
        self.next_order_position = next_order;
        self.next_row_pattern = self.song.pattern_at(next_order) as usize;
    }

    fn advance_row(&mut self) {
        if self.next_row == SONG_END {
            self.finished = true;
            return;
        }
        self.row_position = self.next_row as usize;
        self.current_pattern = self.next_row_pattern;
        self.order_position = self.next_order_position;
    }

    fn mix_channels(&mut self) -> Frame {
        let mut left = 0.0f32;
        let mut right = 0.0f32;
        for (index, ch) in self.channels.iter_mut().enumerate() {
            let (l, r) = ch.next_sample(&self.song.instruments);
            if self.solo.map_or(true, |mask| mask[index]) {
                left += l;
                right += r;
            }
        }
        Frame::from_f32(left, right)
    }

    /// A channel's state, for inspection in tests.
    #[cfg(test)]
    pub(crate) fn channel(&self, index: usize) -> &Channel {
        &self.channels[index]
    }
}
