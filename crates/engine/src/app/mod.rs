mod input;
mod loop_runner;
mod metrics;

pub use input::{InputAction, InputCollector, InputSnapshot};
pub use loop_runner::{
    run_frames, AppError, Frame, FrameSource, LoopConfig, LoopSummary, StopReason, Viewport,
};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
