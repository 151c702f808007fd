use tilerun_engine::{Audio, AudioEffect, Cue};
use tracing::debug;

const TRACK_COUNT: usize = 4;

/// Audio backend that logs every cue instead of playing it.
#[derive(Debug, Default)]
pub(crate) struct TraceAudio {
    muted_tracks: [bool; TRACK_COUNT],
    cues_played: u64,
}

impl TraceAudio {
    pub(crate) fn cues_played(&self) -> u64 {
        self.cues_played
    }

    pub(crate) fn is_track_muted(&self, track: usize) -> bool {
        self.muted_tracks.get(track).copied().unwrap_or(false)
    }
}

impl Audio for TraceAudio {
    fn play_cue(&mut self, cue: Cue) {
        self.play_cue_with(cue, None, false);
    }

    fn play_cue_with(&mut self, cue: Cue, effect: Option<AudioEffect>, looping: bool) {
        self.cues_played += 1;
        match effect {
            Some(AudioEffect::Echo {
                delay_samples,
                decay,
            }) => debug!(cue = ?cue, looping, delay_samples, decay, "audio_cue"),
            None => debug!(cue = ?cue, looping, "audio_cue"),
        }
    }

    fn toggle_track_mute(&mut self, track: usize) {
        let Some(muted) = self.muted_tracks.get_mut(track) else {
            debug!(track, "audio_track_missing");
            return;
        };
        *muted = !*muted;
        debug!(track, muted = *muted, "audio_track_toggled");
    }
}
