//! Headless playback controller for the paula MOD player.
//!
//! Ties the decoder, engine, and audio backend together behind one API
//! the CLI drives: load a module, play it on a background thread, poll
//! the position, or render offline to frames/WAV.

mod wav;

use paula_audio::{AudioError, AudioOutput, CpalOutput};
use paula_engine::Engine;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

// Re-export common types so callers don't need the inner crates.
pub use paula_engine::{Frame, PlaybackPosition};
pub use paula_formats::DecodeError;
pub use paula_ir::{Effect, Song};

pub use wav::{frames_to_wav, write_wav};

/// Frames pulled from the engine per blocking write.
const BATCH_FRAMES: usize = 500;

/// Error type covering everything the player can fail at.
#[derive(Debug)]
pub enum PlayerError {
    /// The module bytes could not be read
    Io(std::io::Error),
    /// The module bytes could not be decoded
    Decode(DecodeError),
    /// The audio sink rejected setup or playback
    Audio(AudioError),
}

impl std::fmt::Display for PlayerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerError::Io(e) => write!(f, "read error: {}", e),
            PlayerError::Decode(e) => write!(f, "decode error: {}", e),
            PlayerError::Audio(e) => write!(f, "audio error: {}", e),
        }
    }
}

impl std::error::Error for PlayerError {}

impl From<DecodeError> for PlayerError {
    fn from(e: DecodeError) -> Self {
        PlayerError::Decode(e)
    }
}

impl From<std::io::Error> for PlayerError {
    fn from(e: std::io::Error) -> Self {
        PlayerError::Io(e)
    }
}

/// Headless player: owns a song and manages one playback session.
pub struct Player {
    song: Song,
    solo: Vec<usize>,
    playback: Option<PlaybackHandle>,
}

struct PlaybackHandle {
    stop_signal: Arc<AtomicBool>,
    position: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
    sink_error: Arc<Mutex<Option<AudioError>>>,
    thread: Option<JoinHandle<()>>,
}

impl Player {
    /// Decode a module into a ready-to-play player.
    pub fn load(data: &[u8]) -> Result<Self, PlayerError> {
        let song = paula_formats::load_mod(data)?;
        Ok(Self {
            song,
            solo: Vec::new(),
            playback: None,
        })
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    /// Restrict playback to the given channels (empty = all four).
    pub fn set_solo(&mut self, channels: &[usize]) {
        self.solo = channels.to_vec();
    }

    // --- Real-time playback ---

    /// Start playback on a background thread. Any previous session is
    /// stopped first.
    pub fn play(&mut self) {
        self.stop();

        let mut engine = Engine::new(self.song.clone());
        engine.set_solo(&self.solo);

        let stop_signal = Arc::new(AtomicBool::new(false));
        let position = Arc::new(AtomicU64::new(0));
        let finished = Arc::new(AtomicBool::new(false));
        let sink_error = Arc::new(Mutex::new(None));

        let stop = stop_signal.clone();
        let pos = position.clone();
        let done = finished.clone();
        let fail = sink_error.clone();

        let thread = std::thread::spawn(move || {
            audio_thread(engine, stop, pos, done, fail);
        });

        self.playback = Some(PlaybackHandle {
            stop_signal,
            position,
            finished,
            sink_error,
            thread: Some(thread),
        });
    }

    /// Signal the playback thread and wait for it to wind down.
    pub fn stop(&mut self) {
        if let Some(mut pb) = self.playback.take() {
            pb.stop_signal.store(true, Ordering::Relaxed);
            if let Some(handle) = pb.thread.take() {
                let _ = handle.join();
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| !p.finished.load(Ordering::Relaxed))
    }

    /// The error that killed the playback thread, if any.
    pub fn sink_error(&self) -> Option<PlayerError> {
        let pb = self.playback.as_ref()?;
        pb.sink_error
            .lock()
            .ok()?
            .take()
            .map(PlayerError::Audio)
    }

    pub fn position(&self) -> Option<PlaybackPosition> {
        let pb = self.playback.as_ref()?;
        if pb.finished.load(Ordering::Relaxed) {
            return None;
        }
        Some(unpack_position(pb.position.load(Ordering::Relaxed)))
    }

    // --- Offline rendering ---

    /// Render up to `max_frames` frames (fewer when the song ends).
    pub fn render_frames(&self, max_frames: usize) -> Vec<Frame> {
        let mut engine = Engine::new(self.song.clone());
        engine.set_solo(&self.solo);

        let mut frames = Vec::with_capacity(max_frames);
        while !engine.is_finished() && frames.len() < max_frames {
            frames.push(engine.render_frame());
        }
        frames
    }

    /// Render the song to an in-memory WAV (16-bit stereo PCM).
    pub fn render_to_wav(&self, max_seconds: u32) -> Vec<u8> {
        let max_frames = 44_100 * max_seconds as usize;
        let frames = self.render_frames(max_frames);
        wav::frames_to_wav(&frames)
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop();
    }
}

fn pack_position(pos: PlaybackPosition) -> u64 {
    ((pos.order as u64) << 32) | ((pos.pattern as u64) << 16) | pos.row as u64
}

fn unpack_position(packed: u64) -> PlaybackPosition {
    PlaybackPosition {
        order: (packed >> 32) as usize & 0xFFFF,
        pattern: (packed >> 16) as usize & 0xFFFF,
        row: packed as usize & 0xFFFF,
    }
}

/// The output loop: pull frame batches from the engine and push them
/// through the blocking sink until the song ends or stop is signalled.
fn audio_thread(
    mut engine: Engine,
    stop_signal: Arc<AtomicBool>,
    position: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
    sink_error: Arc<Mutex<Option<AudioError>>>,
) {
    // The cpal stream is not Send, so the sink lives entirely on this
    // thread; setup failures travel back through the mutex.
    let started = CpalOutput::new().and_then(|(mut output, consumer)| {
        output.build_stream(consumer)?;
        output.start()?;
        Ok(output)
    });
    let mut output = match started {
        Ok(output) => output,
        Err(e) => {
            if let Ok(mut slot) = sink_error.lock() {
                *slot = Some(e);
            }
            finished.store(true, Ordering::Relaxed);
            return;
        }
    };

    // Shutdown is checked per frame so an abort never commits a
    // partial frame, only a shorter batch.
    let mut batch = [Frame::silence(); BATCH_FRAMES];
    while !engine.is_finished() && !stop_signal.load(Ordering::Relaxed) {
        let mut produced = 0;
        while produced < batch.len()
            && !engine.is_finished()
            && !stop_signal.load(Ordering::Relaxed)
        {
            batch[produced] = engine.render_frame();
            produced += 1;
        }
        output.write(&batch[..produced]);
        position.store(pack_position(engine.position()), Ordering::Relaxed);
    }

    // Flush: a tail of silence pushes the last audible frames through
    // the ring buffer before the stream drops.
    let silence = [Frame::silence(); BATCH_FRAMES];
    for _ in 0..(44_100 / BATCH_FRAMES) {
        if stop_signal.load(Ordering::Relaxed) {
            break;
        }
        output.write(&silence);
    }
    let _ = output.stop();

    finished.store(true, Ordering::Relaxed);
}
