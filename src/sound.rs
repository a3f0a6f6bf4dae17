use anyhow::Result;
use bevy_ecs::prelude::Resource;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use crossbeam_channel::{Receiver, Sender, bounded};
use fundsp::hacker32::*;
use log::{debug, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::config::AudioConfig;

// Effects are dropped from the mix after this long
const MAX_EFFECT_SECONDS: f64 = 2.0;

// Background music sits well under the effects
const MUSIC_LEVEL: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    LineClear,
    GameOver,
}

enum AudioCommand {
    Effect(SoundEffect),
    Music(bool),
    Volume(f32),
}

/// Handle to the audio thread plus the player's sound settings.
///
/// Commands are sent without blocking; when the queue is full or the thread
/// has died they are dropped.
#[derive(Resource)]
pub struct AudioState {
    commands: Option<Sender<AudioCommand>>,
    available: Arc<AtomicBool>,
    music_enabled: bool,
    sound_enabled: bool,
    volume: f32,
}

impl AudioState {
    pub fn new() -> Self {
        Self::from_config(&AudioConfig::default())
    }

    /// Starts the audio thread with the configured music, sound and volume settings.
    pub fn from_config(config: &AudioConfig) -> Self {
        let (commands, receiver) = bounded(64);
        let available = Arc::new(AtomicBool::new(true));
        let volume = config.volume.clamp(0.0, 1.0);
        let music_enabled = config.music_enabled;

        let thread_available = Arc::clone(&available);
        thread::spawn(move || {
            let mixer = Mixer::new(volume, music_enabled);
            if let Err(e) = run_audio_thread(&receiver, mixer) {
                warn!("Audio thread error: {e}");
                thread_available.store(false, Ordering::Relaxed);
            }
        });

        Self {
            commands: Some(commands),
            available,
            music_enabled,
            sound_enabled: config.sound_enabled,
            volume,
        }
    }

    /// An audio state with no output thread. Settings still change, nothing is heard.
    pub fn silent() -> Self {
        Self {
            commands: None,
            available: Arc::new(AtomicBool::new(false)),
            music_enabled: false,
            sound_enabled: false,
            volume: 0.5,
        }
    }

    fn send(&self, command: AudioCommand) {
        if let Some(commands) = &self.commands {
            let _ = commands.try_send(command);
        }
    }

    /// Queues `effect`. Returns false when sound effects are switched off.
    pub fn play_sound(&self, effect: SoundEffect) -> bool {
        if !self.sound_enabled {
            return false;
        }
        self.send(AudioCommand::Effect(effect));
        true
    }

    pub fn is_audio_available(&self) -> bool {
        self.commands.is_some() && self.available.load(Ordering::Relaxed)
    }

    pub fn is_music_enabled(&self) -> bool {
        self.music_enabled
    }

    pub fn is_sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
    }

    pub fn get_volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.send(AudioCommand::Volume(self.volume));
    }

    pub fn toggle_music(&mut self) {
        self.music_enabled = !self.music_enabled;
        self.send(AudioCommand::Music(self.music_enabled));
    }
}

impl Default for AudioState {
    fn default() -> Self {
        Self::new()
    }
}

// Everything the output callback needs to produce one stereo frame
struct Mixer {
    music: Box<dyn AudioUnit>,
    effects: Vec<(Box<dyn AudioUnit>, f64)>,
    music_enabled: bool,
    volume: f32,
    sample_rate: f64,
}

impl Mixer {
    fn new(volume: f32, music_enabled: bool) -> Self {
        Self {
            music: create_background_music(),
            effects: Vec::new(),
            music_enabled,
            volume,
            sample_rate: 44_100.0,
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.music.set_sample_rate(sample_rate);
    }

    fn apply(&mut self, command: AudioCommand) {
        match command {
            AudioCommand::Effect(effect) => {
                debug!("Playing {effect:?}");
                let mut unit = create_sound_effect(effect);
                unit.set_sample_rate(self.sample_rate);
                self.effects.push((unit, 0.0));
            }
            AudioCommand::Music(enabled) => self.music_enabled = enabled,
            AudioCommand::Volume(volume) => self.volume = volume,
        }
    }

    fn next_frame(&mut self) -> (f32, f32) {
        let step = 1.0 / self.sample_rate;
        let (mut left, mut right) = (0.0f32, 0.0f32);

        for (unit, elapsed) in &mut self.effects {
            let (l, r) = unit.get_stereo();
            left += l;
            right += r;
            *elapsed += step;
        }
        self.effects
            .retain(|(_, elapsed)| *elapsed < MAX_EFFECT_SECONDS);

        if self.music_enabled {
            let (l, r) = self.music.get_stereo();
            left += l * MUSIC_LEVEL;
            right += r * MUSIC_LEVEL;
        }

        (
            (left * self.volume).clamp(-1.0, 1.0),
            (right * self.volume).clamp(-1.0, 1.0),
        )
    }
}

// Opens the default output device and keeps the stream alive until every
// AudioState handle is gone.
fn run_audio_thread(receiver: &Receiver<AudioCommand>, mut mixer: Mixer) -> Result<()> {
    let device = cpal::default_host()
        .default_output_device()
        .ok_or_else(|| anyhow::anyhow!("No audio output device found"))?;
    let supported = device.default_output_config()?;
    let format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();

    mixer.set_sample_rate(f64::from(config.sample_rate.0));

    let (mixer_commands, mixer_receiver) = bounded::<AudioCommand>(64);
    let _stream = match format {
        cpal::SampleFormat::F32 => open_stream::<f32>(&device, &config, mixer, mixer_receiver)?,
        cpal::SampleFormat::I16 => open_stream::<i16>(&device, &config, mixer, mixer_receiver)?,
        cpal::SampleFormat::U16 => open_stream::<u16>(&device, &config, mixer, mixer_receiver)?,
        other => return Err(anyhow::anyhow!("Unsupported sample format {other:?}")),
    };

    for command in receiver {
        let _ = mixer_commands.try_send(command);
    }

    Ok(())
}

fn open_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut mixer: Mixer,
    commands: Receiver<AudioCommand>,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = usize::from(config.channels);

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            while let Ok(command) = commands.try_recv() {
                mixer.apply(command);
            }

            for frame in data.chunks_mut(channels) {
                let (left, right) = mixer.next_frame();
                // Even channels take the left signal, odd ones the right
                for (channel, sample) in frame.iter_mut().enumerate() {
                    let value = if channel % 2 == 0 { left } else { right };
                    *sample = T::from_sample(value);
                }
            }
        },
        |err| warn!("Error in audio stream: {err}"),
        None,
    )?;

    stream.play()?;
    Ok(stream)
}

// Rising sweep, left of center
fn create_line_clear() -> Box<dyn AudioUnit> {
    let sweep = envelope(|t| lerp(300.0, 800.0, (t * 5.0).min(1.0))) >> sine();

    let node = sweep
        * envelope(|t| {
            if t < 0.2 {
                1.0
            } else {
                (0.5 - t).max(0.0) * 2.0
            }
        })
        * 0.4;

    Box::new(node >> pan(-0.2))
}

// Descending pitch
fn create_game_over() -> Box<dyn AudioUnit> {
    let sweep = envelope(|t| lerp(600.0, 200.0, (t * 0.5).min(1.0))) >> sine();

    let node = sweep * envelope(|t| (2.0 - t).max(0.0) * 0.5) * 0.4;
    Box::new(node >> pan(0.0))
}

pub fn create_sound_effect(effect: SoundEffect) -> Box<dyn AudioUnit> {
    match effect {
        SoundEffect::LineClear => create_line_clear(),
        SoundEffect::GameOver => create_game_over(),
    }
}

pub fn create_background_music() -> Box<dyn AudioUnit> {
    let bass = sine_hz(110.0) * 0.08;

    // Walk a pentatonic scale, two seconds per note
    let melody = lfo(move |t| {
        let notes = [220.0, 261.63, 293.66, 349.23, 392.0];
        let idx = ((t * 0.5) % 5.0) as usize;
        notes[idx]
    }) >> sine() * 0.1;

    let chord = sine_hz(220.0) * 0.03 + sine_hz(329.63) * 0.02 + sine_hz(392.0) * 0.02;

    let rhythm = lfo(move |t| if (t * 2.0) % 1.0 < 0.1 { 0.05 } else { 0.0 }) * sine_hz(440.0);

    let music = (bass + melody + chord + rhythm) * 0.6;

    Box::new(music >> pan(0.0))
}
