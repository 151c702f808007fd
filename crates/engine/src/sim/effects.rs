use super::config::EffectLimits;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusEffectKind {
    Invincibility,
    Gas,
}

impl StatusEffectKind {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Invincibility => "invincibility",
            Self::Gas => "gas",
        }
    }
}

/// A status effect that wears off after enough time or enough player travel,
/// whichever comes first.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimedEffect {
    active: bool,
    elapsed_ms: f32,
    displacement_events: u32,
}

impl TimedEffect {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn displacement_events(&self) -> u32 {
        self.displacement_events
    }

    /// Turns the effect on. Re-activating a running effect keeps its counters.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Counts one travel step toward expiry while the effect runs.
    pub fn record_displacement(&mut self) {
        if self.active {
            self.displacement_events += 1;
        }
    }

    /// Advances the clock and returns `true` if the effect expired this call.
    pub fn tick(&mut self, dt_ms: f32, limits: &EffectLimits) -> bool {
        if !self.active {
            return false;
        }
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms > limits.duration_ms
            || self.displacement_events > limits.displacement_limit
        {
            *self = Self::default();
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatusEffects {
    pub invincibility: TimedEffect,
    pub gas: TimedEffect,
}

impl StatusEffects {
    pub fn get_mut(&mut self, kind: StatusEffectKind) -> &mut TimedEffect {
        match kind {
            StatusEffectKind::Invincibility => &mut self.invincibility,
            StatusEffectKind::Gas => &mut self.gas,
        }
    }

    pub fn record_displacement(&mut self) {
        self.invincibility.record_displacement();
        self.gas.record_displacement();
    }
}

/// Heals the player for walking and for resting.
///
/// Each frame the horizontal distance from the last origin is measured. Going
/// further than the player's width heals a little and moves the origin.
/// Staying within that distance for long enough heals more.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TravelTracker {
    origin_x: Option<f32>,
    displacement: f32,
    stale_ms: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TravelOutcome {
    pub traveled: bool,
    pub rested: bool,
}

impl TravelTracker {
    /// Displacement measured by the latest [`observe`](Self::observe) call.
    pub fn displacement(&self) -> f32 {
        self.displacement
    }

    pub fn observe(
        &mut self,
        player_x: f32,
        player_width: f32,
        dt_ms: f32,
        rest_interval_ms: f32,
    ) -> TravelOutcome {
        let origin_x = *self.origin_x.get_or_insert(player_x);
        self.displacement = (player_x - origin_x).abs();
        self.stale_ms += dt_ms;

        let mut outcome = TravelOutcome::default();
        if self.displacement > player_width {
            outcome.traveled = true;
            self.origin_x = Some(player_x);
            self.stale_ms = 0.0;
        }
        if self.stale_ms > rest_interval_ms && self.displacement < player_width {
            outcome.rested = true;
            self.stale_ms = 0.0;
        }
        outcome
    }
}
