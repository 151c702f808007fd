use std::process::ExitCode;

use tilerun_engine::{
    run_frames, AppError, Audio, Cue, LoopSummary, MapDirectoryLoader, MetricsHandle, Simulation,
};
use tracing::{error, info};

use super::audio::TraceAudio;
use super::bootstrap::AppWiring;
use super::render::TraceRenderer;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    match run_game(app) {
        Ok(summary) => {
            info!(
                frames = summary.frames,
                respawns = summary.respawns,
                levels_advanced = summary.levels_advanced,
                projectiles_spawned = summary.projectiles_spawned,
                "game_finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "run_failed");
            ExitCode::FAILURE
        }
    }
}

fn run_game(app: AppWiring) -> Result<LoopSummary, AppError> {
    let AppWiring {
        loop_config,
        simulation: simulation_config,
        maps_dir,
        source,
        mut frames,
    } = app;

    let drum_track = simulation_config.drum_track;
    let loader = MapDirectoryLoader::new(maps_dir, simulation_config.clone());
    let mut simulation =
        Simulation::new(simulation_config, loader, TraceAudio::default(), source)?;
    start_music(simulation.audio_mut(), drum_track);

    let mut renderer = TraceRenderer::new(loop_config.viewport);
    let metrics = MetricsHandle::default();
    let summary = run_frames(
        &mut simulation,
        &mut frames,
        &mut renderer,
        &loop_config,
        &metrics,
    )?;
    info!(
        frames_drawn = renderer.frames_drawn(),
        cues_played = simulation.audio().cues_played(),
        fps = metrics.snapshot().fps,
        "render_finished"
    );
    Ok(summary)
}

/// Background music loops for the whole session with the drum track muted.
fn start_music<A: Audio>(audio: &mut A, drum_track: usize) {
    audio.play_cue_with(Cue::Music, None, true);
    audio.toggle_track_mute(drum_track);
}
