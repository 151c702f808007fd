use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::warn;

static METRICS_LOCK_POISON_WARNED: AtomicBool = AtomicBool::new(false);

fn warn_metrics_lock_poison_once(operation: &'static str) {
    if METRICS_LOCK_POISON_WARNED
        .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
        .is_ok()
    {
        warn!(operation, "metrics lock poisoned; recovered inner value");
    }
}

/// Loop statistics over one reporting interval of simulated time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub update_cost_ms: f32,
    pub projectiles_spawned: u32,
}

#[derive(Clone, Debug)]
pub struct MetricsHandle {
    snapshot: Arc<RwLock<LoopMetricsSnapshot>>,
}

impl Default for MetricsHandle {
    fn default() -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(LoopMetricsSnapshot::default())),
        }
    }
}

impl MetricsHandle {
    pub fn snapshot(&self) -> LoopMetricsSnapshot {
        match self.snapshot.read() {
            Ok(guard) => *guard,
            Err(poisoned) => {
                warn_metrics_lock_poison_once("read");
                *poisoned.into_inner()
            }
        }
    }

    pub(crate) fn publish(&self, snapshot: LoopMetricsSnapshot) {
        match self.snapshot.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => {
                warn_metrics_lock_poison_once("write");
                let mut guard = poisoned.into_inner();
                *guard = snapshot;
            }
        }
    }
}

/// Intervals are measured in simulated time, so scripted runs report the
/// same frame rates no matter how fast the host executes them.
#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval: Duration,
    simulated: Duration,
    frames: u32,
    update_cost_sum: Duration,
    projectiles_spawned: u32,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            simulated: Duration::ZERO,
            frames: 0,
            update_cost_sum: Duration::ZERO,
            projectiles_spawned: 0,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration, update_cost: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.simulated = self.simulated.saturating_add(frame_dt);
        self.update_cost_sum = self.update_cost_sum.saturating_add(update_cost);
    }

    pub(crate) fn record_projectiles(&mut self, count: u32) {
        self.projectiles_spawned = self.projectiles_spawned.saturating_add(count);
    }

    pub(crate) fn maybe_snapshot(&mut self) -> Option<LoopMetricsSnapshot> {
        if self.frames == 0 || self.simulated < self.interval {
            return None;
        }

        let simulated_seconds = self.simulated.as_secs_f32().max(f32::EPSILON);
        let frames = self.frames as f32;
        let snapshot = LoopMetricsSnapshot {
            fps: frames / simulated_seconds,
            frame_time_ms: self.simulated.as_secs_f32() * 1000.0 / frames,
            update_cost_ms: self.update_cost_sum.as_secs_f32() * 1000.0 / frames,
            projectiles_spawned: self.projectiles_spawned,
        };

        self.simulated = Duration::ZERO;
        self.frames = 0;
        self.update_cost_sum = Duration::ZERO;
        self.projectiles_spawned = 0;

        Some(snapshot)
    }
}
