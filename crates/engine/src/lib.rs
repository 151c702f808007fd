pub mod app;
pub mod content;
mod paths;
pub mod sim;

pub use app::{
    run_frames, AppError, Frame, FrameSource, InputAction, InputCollector, InputSnapshot,
    LoopConfig, LoopMetricsSnapshot, LoopSummary, MetricsHandle, StopReason, Viewport,
};
pub use content::{
    discover_map_numbers, map_file_name, parse_map, MapDirectoryLoader, MapError, MapErrorCode,
    SourceLocation,
};
pub use paths::{find_root_above, resolve_app_paths, AppPaths, StartupError, ROOT_ENV_VAR};
pub use sim::{
    Audio, AudioEffect, Cue, FrameReport, Level, LevelLoader, LevelSource, LevelTransition,
    LoaderError, NullAudio, Renderer, Simulation, SimulationConfig, SimulationError,
};
