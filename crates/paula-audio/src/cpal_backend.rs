//! CPAL-based audio output backend.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};
use paula_engine::Frame;
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::traits::{AudioError, AudioOutput};

/// The engine produces frames at exactly this rate, so the stream is
/// opened at it rather than at the device default.
const OUTPUT_SAMPLE_RATE: u32 = 44_100;

/// CPAL-based audio output.
pub struct CpalOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    producer: HeapProd<Frame>,
    running: Arc<AtomicBool>,
}

impl CpalOutput {
    /// Create a new CPAL output on the default device.
    pub fn new() -> Result<(Self, HeapCons<Frame>), AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        // Make sure the device can run stereo at 44.1 kHz before asking
        // for it.
        let supported = device
            .supported_output_configs()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?
            .find(|c| {
                c.channels() == 2
                    && c.min_sample_rate().0 <= OUTPUT_SAMPLE_RATE
                    && c.max_sample_rate().0 >= OUTPUT_SAMPLE_RATE
            })
            .ok_or_else(|| {
                AudioError::DeviceInit(format!(
                    "device does not support stereo at {} Hz",
                    OUTPUT_SAMPLE_RATE
                ))
            })?;

        let config: StreamConfig = supported
            .with_sample_rate(SampleRate(OUTPUT_SAMPLE_RATE))
            .into();

        // Ring buffer of about 100ms of audio
        let buffer_size = (OUTPUT_SAMPLE_RATE as usize / 10) * 2;
        let rb = HeapRb::<Frame>::new(buffer_size);
        let (producer, consumer) = rb.split();

        let output = Self {
            device,
            config,
            stream: None,
            producer,
            running: Arc::new(AtomicBool::new(false)),
        };

        Ok((output, consumer))
    }

    /// Build and start the audio stream.
    pub fn build_stream(&mut self, mut consumer: HeapCons<Frame>) -> Result<(), AudioError> {
        let running = self.running.clone();

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !running.load(Ordering::Relaxed) {
                        data.fill(0.0);
                        return;
                    }

                    for chunk in data.chunks_mut(2) {
                        if let Some(frame) = consumer.try_pop() {
                            chunk[0] = frame.left as f32 / 32768.0;
                            chunk[1] = frame.right as f32 / 32768.0;
                        } else {
                            // Underrun: stay silent rather than repeat
                            chunk.fill(0.0);
                        }
                    }
                },
                |err| eprintln!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::Playback(e.to_string()))?;
        self.stream = Some(stream);

        Ok(())
    }
}

impl AudioOutput for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn write(&mut self, frames: &[Frame]) {
        let mut remaining = frames;
        while !remaining.is_empty() {
            let pushed = self.producer.push_slice(remaining);
            remaining = &remaining[pushed..];
            if !remaining.is_empty() {
                // Buffer full: the callback drains at real-time rate,
                // so a short nap is the backpressure
                std::thread::sleep(Duration::from_micros(500));
            }
        }
    }

    fn start(&mut self) -> Result<(), AudioError> {
        self.running.store(true, Ordering::Relaxed);
        if let Some(ref stream) = self.stream {
            stream
                .play()
                .map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.running.store(false, Ordering::Relaxed);
        if let Some(ref stream) = self.stream {
            stream
                .pause()
                .map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }
}
