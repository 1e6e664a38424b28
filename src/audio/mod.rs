use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use kira::{
    manager::{AudioManager, AudioManagerSettings, backend::DefaultBackend},
    sound::{static_sound::{StaticSoundData, StaticSoundSettings, StaticSoundHandle}, PlaybackRate},
    tween::Tween,
    Volume,
};
use rand::Rng;

/// Volume and pitch of one sound-effect playback.
#[derive(Debug, Clone, Copy)]
pub struct SoundConfig {
    pub volume: f32,
    pub pitch: f32,
    /// Random pitch spread; `0.1` plays between 90% and 110%.
    pub pitch_variation: f32,
    /// Random volume spread, same scale as `pitch_variation`.
    pub volume_variation: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self { volume: 1.0, pitch: 1.0, pitch_variation: 0.0, volume_variation: 0.0 }
    }
}

pub struct AudioContext {
    /// `None` without an output device; every call is then a no-op.
    manager: Option<AudioManager>,
    sounds: HashMap<String, StaticSoundData>,
    music_track: Option<String>,
    active_music: Option<StaticSoundHandle>,
}

impl AudioContext {
    pub fn new() -> Self {
        let manager = match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
            Ok(m) => Some(m),
            Err(e) => {
                log::warn!("failed to initialize audio manager: {e}; audio disabled");
                None
            }
        };
        Self {
            manager,
            sounds: HashMap::new(),
            music_track: None,
            active_music: None,
        }
    }

    pub fn is_available(&self) -> bool { self.manager.is_some() }

    pub fn is_loaded(&self, name: &str) -> bool { self.sounds.contains_key(name) }

    /// Load a sound file (OGG, WAV) into memory under `name`.
    /// Logs a warning and returns false if the file cannot be read.
    pub fn load_sound<P: AsRef<Path>>(&mut self, name: &str, path: P) -> bool {
        match StaticSoundData::from_file(path.as_ref()) {
            Ok(sound) => {
                self.sounds.insert(name.to_string(), sound);
                true
            }
            Err(e) => {
                log::warn!("failed to load sound '{name}' from {}: {e}", path.as_ref().display());
                false
            }
        }
    }

    /// Play a sound once with optional variation.
    pub fn play(&mut self, name: &str, config: SoundConfig) {
        let Some(manager) = self.manager.as_mut() else { return; };
        let Some(data) = self.sounds.get(name) else {
            log::debug!("sound '{name}' is not loaded");
            return;
        };

        let mut rng = rand::thread_rng();
        let p_offset = rng.gen_range(-1.0f32..=1.0) * config.pitch_variation;
        let v_offset = rng.gen_range(-1.0f32..=1.0) * config.volume_variation;

        let mut settings = StaticSoundSettings::new();
        settings.playback_rate = PlaybackRate::Factor((config.pitch + p_offset) as f64).into();
        settings.volume = Volume::Amplitude((config.volume + v_offset).clamp(0.0, 2.0) as f64).into();

        if let Err(e) = manager.play(data.clone().with_settings(settings)) {
            log::warn!("failed to play sound '{name}': {e}");
        }
    }

    /// Start looping the sound `name` as background music, fading it in.
    pub fn play_music(&mut self, name: &str, fade_in_secs: f32) {
        self.music_track = Some(name.to_string());
        let Some(manager) = self.manager.as_mut() else { return; };
        let Some(data) = self.sounds.get(name) else {
            log::warn!("music '{name}' is not loaded");
            return;
        };

        if let Some(mut handle) = self.active_music.take() {
            let _ = handle.stop(fade(0.5));
        }

        let mut settings = StaticSoundSettings::new().loop_region(0.0..);
        settings.volume = Volume::Amplitude(0.0).into();

        match manager.play(data.clone().with_settings(settings)) {
            Ok(mut handle) => {
                let _ = handle.set_volume(Volume::Amplitude(1.0), fade(fade_in_secs));
                self.active_music = Some(handle);
            }
            Err(e) => log::warn!("failed to play music '{name}': {e}"),
        }
    }

    pub fn stop_music(&mut self) {
        if let Some(mut handle) = self.active_music.take() {
            let _ = handle.stop(fade(0.5));
        }
    }

    pub fn is_music_playing(&self) -> bool {
        self.active_music.is_some()
    }

    /// Stop the music if it plays, else restart the last track.
    pub fn toggle_music(&mut self) {
        if self.is_music_playing() {
            self.stop_music();
            log::info!("music off");
        } else if let Some(track) = self.music_track.clone() {
            self.play_music(&track, 0.5);
            log::info!("music on");
        }
    }
}

impl Default for AudioContext {
    fn default() -> Self { Self::new() }
}

fn fade(secs: f32) -> Tween {
    Tween {
        duration: Duration::from_secs_f32(secs.max(0.0)),
        ..Default::default()
    }
}
