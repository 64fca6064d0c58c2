//! Audio cue routing
//!
//! The game only decides *when* a cue plays. Playback belongs to an
//! [`AudioSink`] supplied by the host; without one every call is a no-op.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Bullet fired
    Fire,
    /// Target destroyed or tank crashed
    Impact,
    /// Level cleared
    Win,
}

impl AudioCue {
    pub fn as_str(self) -> &'static str {
        match self {
            AudioCue::Fire => "fire",
            AudioCue::Impact => "impact",
            AudioCue::Win => "win",
        }
    }
}

/// Playback backend. Calls are fire-and-forget.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue, volume: f32);

    fn set_volume(&mut self, volume: f32);

    /// Start the looping background track
    fn start_music(&mut self, _volume: f32) {}
}

/// Cue triggered by a frame event, if any
pub fn cue_for(event: &GameEvent) -> Option<AudioCue> {
    match event {
        GameEvent::Fired { .. } => Some(AudioCue::Fire),
        GameEvent::Impact { .. } => Some(AudioCue::Impact),
        GameEvent::LevelCleared { .. } => Some(AudioCue::Win),
        GameEvent::PhaseChanged { .. }
        | GameEvent::GameOver { .. }
        | GameEvent::VolumeChanged(_) => None,
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Option<Box<dyn AudioSink>>,
    volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(crate::settings::DEFAULT_VOLUME)
    }
}

impl AudioManager {
    /// Manager with no backend attached
    pub fn new(volume: f32) -> Self {
        Self {
            sink: None,
            volume: volume.clamp(0.0, 1.0),
            muted: false,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn AudioSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Set master volume (0.0 - 1.0) and forward it to the sink
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        let effective = self.effective_volume();
        if let Some(sink) = self.sink.as_mut() {
            sink.set_volume(effective);
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        let effective = self.effective_volume();
        if let Some(sink) = self.sink.as_mut() {
            sink.set_volume(effective);
        }
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    pub fn start_music(&mut self) {
        let volume = self.effective_volume();
        if let Some(sink) = self.sink.as_mut() {
            sink.start_music(volume);
        }
    }

    /// Play a cue at the current volume
    pub fn play(&mut self, cue: AudioCue) {
        let volume = self.effective_volume();
        if volume <= 0.0 {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.play(cue, volume);
        }
    }

    /// Route one frame's events to cues and volume changes
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::VolumeChanged(volume) = event {
                self.set_volume(*volume);
            } else if let Some(cue) = cue_for(event) {
                self.play(cue);
            }
        }
    }
}

/// Sink that only logs cues (headless runs)
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, cue: AudioCue, volume: f32) {
        log::debug!("audio: {} at {:.2}", cue.as_str(), volume);
    }

    fn set_volume(&mut self, volume: f32) {
        log::debug!("audio: volume {volume:.2}");
    }

    fn start_music(&mut self, volume: f32) {
        log::debug!("audio: music at {volume:.2}");
    }
}
