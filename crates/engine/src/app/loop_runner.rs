use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use crate::sim::{
    Audio, Level, LevelLoader, LevelTransition, Renderer, Simulation, SimulationError, TILE_SIZE,
};

use super::metrics::MetricsAccumulator;
use super::{InputSnapshot, MetricsHandle};

/// One step of outside time and the input seen during it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub elapsed: Duration,
    pub input: InputSnapshot,
}

/// Supplies frames to the loop until it runs dry.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<Frame>;
}

/// Screen area the camera shows, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

impl Viewport {
    /// Horizontal camera offset for drawing `level`.
    ///
    /// The player sits a tile left of centre, and the camera never scrolls
    /// past either end of the map.
    pub fn camera_offset_x(&self, level: &Level) -> i32 {
        let width = self.width as i32;
        let map_width = level.grid().pixel_width() as i32;
        let player_x = (level.player().body().position.x + 0.5).floor() as i32;
        let offset = width / 2 - player_x - TILE_SIZE;
        offset.min(0).max(width - map_width)
    }

    /// Vertical offset that pins the bottom of the map to the bottom of the
    /// screen.
    pub fn camera_offset_y(&self, level: &Level) -> i32 {
        self.height as i32 - level.grid().pixel_height() as i32
    }

    /// Left edge of the visible world, in world pixels.
    pub fn view_left(&self, level: &Level) -> i32 {
        -self.camera_offset_x(level)
    }
}

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub default_frame_delta: Duration,
    pub max_frames: Option<u64>,
    pub metrics_log_interval: Duration,
    pub viewport: Viewport,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            default_frame_delta: Duration::from_millis(16),
            max_frames: None,
            metrics_log_interval: Duration::from_secs(1),
            viewport: Viewport::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("simulation failed: {0}")]
    Simulation(#[from] SimulationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    ExitRequested,
    FramesExhausted,
    FrameLimit,
}

impl StopReason {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::ExitRequested => "exit_requested",
            Self::FramesExhausted => "frames_exhausted",
            Self::FrameLimit => "frame_limit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames: u64,
    pub simulated: Duration,
    pub respawns: u32,
    pub levels_advanced: u32,
    pub projectiles_spawned: u64,
    pub stop_reason: StopReason,
}

/// Pumps frames into the simulation until exit is requested, the source runs
/// dry, or the frame limit is reached. After each update, creatures inside
/// the viewport are woken and the level is drawn.
pub fn run_frames<L, A, F, R>(
    simulation: &mut Simulation<L, A>,
    frames: &mut F,
    renderer: &mut R,
    config: &LoopConfig,
    metrics_handle: &MetricsHandle,
) -> Result<LoopSummary, AppError>
where
    L: LevelLoader,
    A: Audio,
    F: FrameSource,
    R: Renderer,
{
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    info!(
        max_frames = ?config.max_frames,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        viewport_width = config.viewport.width,
        viewport_height = config.viewport.height,
        "loop_config"
    );

    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);
    let mut summary = LoopSummary {
        frames: 0,
        simulated: Duration::ZERO,
        respawns: 0,
        levels_advanced: 0,
        projectiles_spawned: 0,
        stop_reason: StopReason::FramesExhausted,
    };

    loop {
        if config.max_frames.is_some_and(|max| summary.frames >= max) {
            summary.stop_reason = StopReason::FrameLimit;
            break;
        }
        let Some(frame) = frames.next_frame() else {
            summary.stop_reason = StopReason::FramesExhausted;
            break;
        };

        let update_started = Instant::now();
        let report = simulation.update(frame.elapsed, &frame.input)?;
        let view_left = config.viewport.view_left(simulation.level());
        let woken = simulation.wake_creatures_in_view(view_left, config.viewport.width as i32);
        if woken > 0 {
            debug!(woken, view_left, "creatures_woken");
        }
        renderer.draw(simulation.level());
        let update_cost = update_started.elapsed();

        summary.frames += 1;
        summary.simulated = summary.simulated.saturating_add(frame.elapsed);
        summary.projectiles_spawned += u64::from(report.projectiles_spawned);
        match report.transition {
            Some(LevelTransition::Respawned) => summary.respawns += 1,
            Some(LevelTransition::Advanced) => summary.levels_advanced += 1,
            None => {}
        }

        metrics_accumulator.record_frame(frame.elapsed, update_cost);
        metrics_accumulator.record_projectiles(report.projectiles_spawned);
        if let Some(snapshot) = metrics_accumulator.maybe_snapshot() {
            metrics_handle.publish(snapshot);
            let player = simulation.level().player();
            info!(
                fps = snapshot.fps,
                frame_time_ms = snapshot.frame_time_ms,
                update_cost_ms = snapshot.update_cost_ms,
                projectiles_spawned = snapshot.projectiles_spawned,
                level = simulation.level().name(),
                health = player.health(),
                score = player.score(),
                "loop_metrics"
            );
        }

        if report.exit_requested {
            info!(reason = "exit_action", "shutdown_requested");
            summary.stop_reason = StopReason::ExitRequested;
            break;
        }
    }

    info!(
        frames = summary.frames,
        simulated_ms = summary.simulated.as_millis() as u64,
        respawns = summary.respawns,
        levels_advanced = summary.levels_advanced,
        stop_reason = summary.stop_reason.as_token(),
        "shutdown"
    );
    Ok(summary)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
