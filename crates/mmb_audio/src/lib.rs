//! Sound playback for the game.
//!
//! Gameplay code never talks to an audio device directly. It is handed an
//! `AudioSink` and asks for a `Sound` cue; the real `AudioService` plays the
//! clip through rodio, while `NullAudio` (and test fakes) swallow the cue.

pub mod service;

pub use service::AudioService;

/// The two clips the game knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    Jump,
    EnemyHit,
}

impl Sound {
    pub const ALL: [Sound; 2] = [Sound::Jump, Sound::EnemyHit];

    pub fn label(self) -> &'static str {
        match self {
            Sound::Jump => "jump",
            Sound::EnemyHit => "enemy hit",
        }
    }
}

impl std::fmt::Display for Sound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub trait AudioSink {
    /// Play `sound` from its beginning, cutting off any playback of the same
    /// clip that is still running.
    fn play(&mut self, sound: Sound);
}

/// Sink that plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _sound: Sound) {}
}
