//! Audio output - drives the shared voice from the device callback

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};

use tonecanvas::{
    synth::{lock, SharedVoice},
    MAX_BLOCK_SIZE,
};

/// A running output stream. Dropping it stops the audio.
pub struct AudioOutput {
    _stream: cpal::Stream,
    pub sample_rate: f32,
}

/// Device sample rate, needed before the voice can be built.
pub fn default_sample_rate() -> EyreResult<f32> {
    let device = cpal::default_host()
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;
    Ok(config.sample_rate().0 as f32)
}

impl AudioOutput {
    /// Open the default device and render `voice` into it.
    pub fn start(voice: SharedVoice) -> EyreResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        tracing::info!(sample_rate, channels, "audio device opened");

        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;
                let mut voice = lock(&voice);

                while frames_written < total_frames {
                    let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames_to_render];
                    voice.render_block(block);

                    // Copy to output (mono to all channels)
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                    }

                    frames_written += frames_to_render;
                }
            },
            |err| tracing::error!(%err, "audio stream error"),
            None,
        )?;

        stream.play()?;

        Ok(Self {
            _stream: stream,
            sample_rate,
        })
    }
}
