use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::content::MapError;

use super::level::{Level, LevelError};

/// Where a level came from when it was supplied explicitly rather than picked
/// from the loader's own sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSource(PathBuf);

impl LevelSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("no level available in {location}")]
    NoLevelAvailable { location: String },
    #[error("failed to read level file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    InvalidLevel(#[from] LevelError),
}

/// Supplies levels to the simulation. Every returned level must satisfy the
/// [`Level`] invariants.
pub trait LevelLoader {
    fn reload_current_level(&mut self) -> Result<Level, LoaderError>;
    fn load_next_level(&mut self) -> Result<Level, LoaderError>;
    fn load_level_from_source(&mut self, source: &LevelSource) -> Result<Level, LoaderError>;

    fn load_initial_level(&mut self, source: Option<&LevelSource>) -> Result<Level, LoaderError> {
        match source {
            Some(source) => self.load_level_from_source(source),
            None => self.load_next_level(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Prize,
    Boop,
    Music,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioEffect {
    Echo { delay_samples: u32, decay: f32 },
}

/// Echo used for kills and level completion.
pub const PRIZE_ECHO: AudioEffect = AudioEffect::Echo {
    delay_samples: 2000,
    decay: 0.7,
};

/// Fire-and-forget sound output. Failures stay inside the implementation.
pub trait Audio {
    fn play_cue(&mut self, cue: Cue);
    fn play_cue_with(&mut self, cue: Cue, effect: Option<AudioEffect>, looping: bool);
    fn toggle_track_mute(&mut self, track: usize);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl Audio for NullAudio {
    fn play_cue(&mut self, _cue: Cue) {}

    fn play_cue_with(&mut self, _cue: Cue, _effect: Option<AudioEffect>, _looping: bool) {}

    fn toggle_track_mute(&mut self, _track: usize) {}
}

/// Draws a read-only view of the level once per frame.
pub trait Renderer {
    fn draw(&mut self, level: &Level);
}
